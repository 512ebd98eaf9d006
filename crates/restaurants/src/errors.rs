//! Well-known restaurant errors.

use bistro_core::{DishId, Error, RestaurantId};

/// Catalog of restaurant-specific errors.
pub struct RestaurantErrors;

impl RestaurantErrors {
    pub fn not_found(id: RestaurantId) -> Error {
        Error::not_found(
            "Restaurant.NotFound",
            format!("The restaurant with the ID {id} was not found."),
        )
    }

    pub fn dish_not_found(id: DishId) -> Error {
        Error::not_found("Dish.NotFound", format!("The dish with the ID {id} was not found."))
    }

    pub fn name_too_long() -> Error {
        Error::validation("Restaurant.NameTooLong", "The restaurant name is too long.")
    }

    pub fn description_too_long() -> Error {
        Error::validation(
            "Restaurant.DescriptionTooLong",
            "The restaurant description is too long.",
        )
    }

    pub fn invalid_email() -> Error {
        Error::validation("Restaurant.InvalidEmail", "The email address is invalid.")
    }

    pub fn invalid_phone_number() -> Error {
        Error::validation("Restaurant.InvalidPhoneNumber", "The phone number is invalid.")
    }
}
