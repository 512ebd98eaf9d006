//! Field rules shared by the restaurant validators.

use bistro_restaurants::limits::*;
use bistro_restaurants::{Address, RestaurantDetails, RestaurantErrors};

use super::create::NewDish;
use crate::validation::Failures;

/// Rules for every mutable restaurant field, reported under top-level
/// names (`name`, `address.city`, ...).
pub(crate) fn details(f: &mut Failures, details: &RestaurantDetails) {
    f.string("name", &details.name)
        .required()
        .max_length(NAME_MAX)
        .with_message(RestaurantErrors::name_too_long().message().to_string());
    f.string("description", &details.description)
        .required()
        .max_length(DESCRIPTION_MAX)
        .with_message(RestaurantErrors::description_too_long().message().to_string());
    f.string("category", &details.category).required().max_length(CATEGORY_MAX);

    if let Some(rule) = f.optional_string("contact_email", details.contact_email.as_deref()) {
        rule.max_length(CONTACT_EMAIL_MAX)
            .email()
            .with_message(RestaurantErrors::invalid_email().message().to_string());
    }
    if let Some(rule) = f.optional_string("contact_number", details.contact_number.as_deref()) {
        rule.max_length(CONTACT_NUMBER_MAX)
            .phone_number()
            .with_message(RestaurantErrors::invalid_phone_number().message().to_string());
    }

    f.nested("address", details.address.as_ref(), address);
}

pub(crate) fn address(f: &mut Failures, address: &Address) {
    f.string("city", &address.city).required().max_length(CITY_MAX);
    f.string("street", &address.street).required().max_length(STREET_MAX);
    f.string("postal_code", &address.postal_code)
        .required()
        .max_length(POSTAL_CODE_MAX);
}

pub(crate) fn dish(f: &mut Failures, dish: &NewDish) {
    f.string("name", &dish.name).required().max_length(DISH_NAME_MAX);
    f.string("description", &dish.description)
        .required()
        .max_length(DISH_DESCRIPTION_MAX);
    f.number("price", dish.price).at_most(PRICE_MAX);
}
