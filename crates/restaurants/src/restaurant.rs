use serde::{Deserialize, Serialize};

use bistro_core::{DishId, Entity, RestaurantId, ValueObject};

/// Postal address of a restaurant. All parts are required when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

impl ValueObject for Address {}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: String,
    description: String,
    /// Price in minor currency units (cents).
    price: u64,
}

impl Dish {
    pub fn new(id: DishId, name: impl Into<String>, description: impl Into<String>, price: u64) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> u64 {
        self.price
    }
}

impl Entity for Dish {
    type Id = DishId;

    fn id(&self) -> DishId {
        self.id
    }
}

/// Every mutable field of a restaurant.
///
/// Updates replace all of these at once; an absent optional field clears
/// the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantDetails {
    pub name: String,
    pub description: String,
    pub category: String,
    pub has_delivery: bool,
    pub contact_email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<Address>,
}

/// Restaurant entity. Owns its dishes; deleting it deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    id: RestaurantId,
    details: RestaurantDetails,
    dishes: Vec<Dish>,
}

impl Restaurant {
    /// A new restaurant with no dishes.
    pub fn new(id: RestaurantId, details: RestaurantDetails) -> Self {
        Self {
            id,
            details,
            dishes: Vec::new(),
        }
    }

    /// Rebuild a restaurant loaded from storage.
    pub fn from_parts(id: RestaurantId, details: RestaurantDetails, dishes: Vec<Dish>) -> Self {
        Self { id, details, dishes }
    }

    pub fn details(&self) -> &RestaurantDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn address(&self) -> Option<&Address> {
        self.details.address.as_ref()
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn dish(&self, id: DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    /// Overwrite every mutable field (full replace, not a patch).
    pub fn update_details(&mut self, details: RestaurantDetails) {
        self.details = details;
    }

    pub fn add_dish(&mut self, dish: Dish) {
        self.dishes.push(dish);
    }

    /// Remove a dish; returns it if it was on the menu.
    pub fn remove_dish(&mut self, id: DishId) -> Option<Dish> {
        let idx = self.dishes.iter().position(|d| d.id == id)?;
        Some(self.dishes.remove(idx))
    }

    pub fn into_parts(self) -> (RestaurantId, RestaurantDetails, Vec<Dish>) {
        (self.id, self.details, self.dishes)
    }
}

impl Entity for Restaurant {
    type Id = RestaurantId;

    fn id(&self) -> RestaurantId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> RestaurantDetails {
        RestaurantDetails {
            name: name.to_string(),
            description: "Wood-fired pizza".to_string(),
            category: "Italian".to_string(),
            has_delivery: true,
            contact_email: Some("hello@napoli.test".to_string()),
            contact_number: Some("+393331234567".to_string()),
            address: Some(Address {
                city: "Naples".to_string(),
                street: "Via Toledo 1".to_string(),
                postal_code: "80134".to_string(),
            }),
        }
    }

    #[test]
    fn new_restaurant_has_no_dishes() {
        let r = Restaurant::new(RestaurantId::new(), details("Napoli"));
        assert!(r.dishes().is_empty());
        assert_eq!(r.name(), "Napoli");
    }

    #[test]
    fn update_details_replaces_all_fields_including_address() {
        let mut r = Restaurant::new(RestaurantId::new(), details("Napoli"));
        let mut next = details("Roma");
        next.address = None;
        next.contact_email = None;
        next.has_delivery = false;

        r.update_details(next.clone());

        assert_eq!(r.details(), &next);
        assert!(r.address().is_none());
    }

    #[test]
    fn add_and_remove_dish() {
        let mut r = Restaurant::new(RestaurantId::new(), details("Napoli"));
        let dish_id = DishId::new();
        r.add_dish(Dish::new(dish_id, "Margherita", "Tomato, basil", 950));

        assert_eq!(r.dish(dish_id).map(Dish::price), Some(950));

        let removed = r.remove_dish(dish_id).unwrap();
        assert_eq!(removed.name(), "Margherita");
        assert!(r.dishes().is_empty());
        assert!(r.remove_dish(dish_id).is_none());
    }

    #[test]
    fn entities_compare_identity_by_id() {
        let id = RestaurantId::new();
        let a = Restaurant::new(id, details("A"));
        let b = Restaurant::new(id, details("B"));
        assert!(a.same_identity_as(&b));
        assert_ne!(a, b);
    }
}
