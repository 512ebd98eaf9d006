//! Read models returned by the restaurant queries.

use serde::{Deserialize, Serialize};

use bistro_core::{DishId, Entity, RestaurantId};
use bistro_restaurants::{Address, Dish, Restaurant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub id: RestaurantId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub has_delivery: bool,
    pub contact_email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<AddressResponse>,
    pub dishes: Vec<DishResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishResponse {
    pub id: DishId,
    pub name: String,
    pub description: String,
    /// Minor currency units.
    pub price: u64,
}

impl From<&Address> for AddressResponse {
    fn from(value: &Address) -> Self {
        Self {
            city: value.city.clone(),
            street: value.street.clone(),
            postal_code: value.postal_code.clone(),
        }
    }
}

impl From<&Dish> for DishResponse {
    fn from(value: &Dish) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_string(),
            description: value.description().to_string(),
            price: value.price(),
        }
    }
}

impl From<&Restaurant> for RestaurantResponse {
    fn from(value: &Restaurant) -> Self {
        let details = value.details();
        Self {
            id: value.id(),
            name: details.name.clone(),
            description: details.description.clone(),
            category: details.category.clone(),
            has_delivery: details.has_delivery,
            contact_email: details.contact_email.clone(),
            contact_number: details.contact_number.clone(),
            address: details.address.as_ref().map(AddressResponse::from),
            dishes: value.dishes().iter().map(DishResponse::from).collect(),
        }
    }
}
