//! Create a restaurant, optionally with an initial menu.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{DishId, FieldFailure, Outcome, RestaurantId};
use bistro_restaurants::{Dish, Restaurant, RestaurantDetails};

use super::rules;
use crate::data::{ChangeSet, RestaurantStore};
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;
use crate::validation::{Failures, Validator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRestaurant {
    pub details: RestaurantDetails,
    pub dishes: Vec<NewDish>,
}

/// Dish supplied with a create or add-dish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDish {
    pub name: String,
    pub description: String,
    /// Minor currency units.
    pub price: u64,
}

impl NewDish {
    pub(crate) fn into_dish(self, id: DishId) -> Dish {
        Dish::new(id, self.name, self.description, self.price)
    }
}

impl Request for CreateRestaurant {
    type Response = RestaurantId;
    const NAME: &'static str = "CreateRestaurant";
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateRestaurantValidator;

impl Validator<CreateRestaurant> for CreateRestaurantValidator {
    fn validate(&self, request: &CreateRestaurant) -> Vec<FieldFailure> {
        let mut f = Failures::new();
        rules::details(&mut f, &request.details);
        f.each("dishes", &request.dishes, |f, dish| {
            rules::dish(f, dish);
        });
        f.into_vec()
    }
}

pub struct CreateRestaurantHandler {
    store: Arc<dyn RestaurantStore>,
}

impl CreateRestaurantHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateRestaurant> for CreateRestaurantHandler {
    async fn handle(&self, request: &CreateRestaurant, cancel: &CancellationToken) -> HandlerResult<RestaurantId> {
        let id = RestaurantId::new();
        let mut restaurant = Restaurant::new(id, request.details.clone());
        for dish in request.dishes.iter().cloned() {
            restaurant.add_dish(dish.into_dish(DishId::new()));
        }

        let dishes = restaurant.dishes().len();
        self.store.save_changes(ChangeSet::new().insert(restaurant), cancel).await?;

        tracing::debug!(restaurant_id = %id, dishes, "restaurant created");
        Ok(Outcome::success(id))
    }
}

#[cfg(test)]
mod tests {
    use bistro_core::Rule;
    use bistro_restaurants::Address;

    use super::*;

    fn valid() -> CreateRestaurant {
        CreateRestaurant {
            details: RestaurantDetails {
                name: "Test Restaurant".into(),
                description: "Test Description".into(),
                category: "Italian".into(),
                has_delivery: true,
                contact_email: Some("test@test.com".into()),
                contact_number: Some("+123456789".into()),
                address: Some(Address {
                    city: "Test City".into(),
                    street: "Test Street".into(),
                    postal_code: "12345".into(),
                }),
            },
            dishes: vec![NewDish {
                name: "Lasagne".into(),
                description: "Baked pasta".into(),
                price: 1450,
            }],
        }
    }

    fn fields(failures: &[FieldFailure]) -> Vec<&str> {
        failures.iter().map(|f| f.field.as_str()).collect()
    }

    #[test]
    fn valid_command_has_no_failures() {
        assert!(CreateRestaurantValidator.validate(&valid()).is_empty());
    }

    #[test]
    fn absent_optional_fields_are_not_checked() {
        let mut cmd = valid();
        cmd.details.contact_email = None;
        cmd.details.contact_number = Some(String::new());
        cmd.details.address = None;
        cmd.dishes.clear();

        assert!(CreateRestaurantValidator.validate(&cmd).is_empty());
    }

    #[test]
    fn name_of_101_characters_is_rejected_and_100_accepted() {
        let mut cmd = valid();
        cmd.details.name = "a".repeat(100);
        assert!(CreateRestaurantValidator.validate(&cmd).is_empty());

        cmd.details.name = "a".repeat(101);
        let failures = CreateRestaurantValidator.validate(&cmd);
        assert_eq!(fields(&failures), vec!["name"]);
        assert_eq!(failures[0].rule, Rule::MaximumLength { max: 100 });
        assert_eq!(failures[0].message, "The restaurant name is too long.");
    }

    #[test]
    fn invalid_contact_fields_are_reported() {
        let mut cmd = valid();
        cmd.details.contact_email = Some("not-an-email".into());
        cmd.details.contact_number = Some("abc".into());

        let failures = CreateRestaurantValidator.validate(&cmd);
        assert_eq!(fields(&failures), vec!["contact_email", "contact_number"]);
        assert_eq!(failures[0].rule, Rule::Email);
        assert_eq!(failures[1].rule, Rule::PhoneNumber);
    }

    #[test]
    fn every_failing_field_is_reported_in_declaration_order() {
        let mut cmd = valid();
        cmd.details.name = String::new();
        cmd.details.description = "d".repeat(501);
        cmd.details.category = String::new();

        let failures = CreateRestaurantValidator.validate(&cmd);
        assert_eq!(fields(&failures), vec!["name", "description", "category"]);
    }

    #[test]
    fn address_parts_are_required_when_address_is_present() {
        let mut cmd = valid();
        cmd.details.address = Some(Address {
            city: String::new(),
            street: "s".repeat(201),
            postal_code: "12345".into(),
        });

        let failures = CreateRestaurantValidator.validate(&cmd);
        assert_eq!(fields(&failures), vec!["address.city", "address.street"]);
    }

    #[test]
    fn dishes_are_validated_with_indexed_paths() {
        let mut cmd = valid();
        cmd.dishes.push(NewDish {
            name: String::new(),
            description: "x".into(),
            price: 100,
        });

        let failures = CreateRestaurantValidator.validate(&cmd);
        assert_eq!(fields(&failures), vec!["dishes[1].name"]);
    }
}
