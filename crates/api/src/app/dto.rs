use serde::{Deserialize, Serialize};

use bistro_application::restaurants::{CreateRestaurant, NewDish};
use bistro_restaurants::{Address, RestaurantDetails};

/// Restaurant fields shared by create and update bodies.
///
/// Missing strings deserialize as empty so the validators report them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestaurantBody {
    pub name: String,
    pub description: String,
    pub category: String,
    pub has_delivery: bool,
    pub contact_email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<AddressBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressBody {
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DishBody {
    pub name: String,
    pub description: String,
    pub price: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRestaurantRequest {
    #[serde(flatten)]
    pub restaurant: RestaurantBody,
    #[serde(default)]
    pub dishes: Vec<DishBody>,
}

pub type UpdateRestaurantRequest = RestaurantBody;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub role: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Blank optional strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RestaurantBody> for RestaurantDetails {
    fn from(body: RestaurantBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            category: body.category,
            has_delivery: body.has_delivery,
            contact_email: present(body.contact_email),
            contact_number: present(body.contact_number),
            address: body.address.map(Address::from),
        }
    }
}

impl From<AddressBody> for Address {
    fn from(body: AddressBody) -> Self {
        Self {
            city: body.city,
            street: body.street,
            postal_code: body.postal_code,
        }
    }
}

impl From<DishBody> for NewDish {
    fn from(body: DishBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
        }
    }
}

impl From<CreateRestaurantRequest> for CreateRestaurant {
    fn from(body: CreateRestaurantRequest) -> Self {
        Self {
            details: body.restaurant.into(),
            dishes: body.dishes.into_iter().map(NewDish::from).collect(),
        }
    }
}
