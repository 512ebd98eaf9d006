//! Menu maintenance: add and remove dishes of a restaurant.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{DishId, FieldFailure, Outcome, RestaurantId};
use bistro_restaurants::RestaurantErrors;

use super::create::NewDish;
use super::rules;
use crate::data::{ChangeSet, RestaurantStore};
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;
use crate::validation::{Failures, Validator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDish {
    pub restaurant_id: RestaurantId,
    pub dish: NewDish,
}

impl Request for AddDish {
    type Response = DishId;
    const NAME: &'static str = "AddDish";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveDish {
    pub restaurant_id: RestaurantId,
    pub dish_id: DishId,
}

impl Request for RemoveDish {
    type Response = ();
    const NAME: &'static str = "RemoveDish";
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AddDishValidator;

impl Validator<AddDish> for AddDishValidator {
    fn validate(&self, request: &AddDish) -> Vec<FieldFailure> {
        let mut f = Failures::new();
        rules::dish(&mut f, &request.dish);
        f.into_vec()
    }
}

pub struct AddDishHandler {
    store: Arc<dyn RestaurantStore>,
}

impl AddDishHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<AddDish> for AddDishHandler {
    async fn handle(&self, request: &AddDish, cancel: &CancellationToken) -> HandlerResult<DishId> {
        if self.store.find(request.restaurant_id, cancel).await?.is_none() {
            return Ok(Outcome::failure(RestaurantErrors::not_found(request.restaurant_id)));
        }

        let dish_id = DishId::new();
        let changes = ChangeSet::new().add_dish(request.restaurant_id, request.dish.clone().into_dish(dish_id));
        self.store.save_changes(changes, cancel).await?;

        Ok(Outcome::success(dish_id))
    }
}

pub struct RemoveDishHandler {
    store: Arc<dyn RestaurantStore>,
}

impl RemoveDishHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<RemoveDish> for RemoveDishHandler {
    async fn handle(&self, request: &RemoveDish, cancel: &CancellationToken) -> HandlerResult<()> {
        let Some(restaurant) = self.store.find(request.restaurant_id, cancel).await? else {
            return Ok(Outcome::failure(RestaurantErrors::not_found(request.restaurant_id)));
        };

        if restaurant.dish(request.dish_id).is_none() {
            return Ok(Outcome::failure(RestaurantErrors::dish_not_found(request.dish_id)));
        }
        let changes = ChangeSet::new().remove_dish(request.restaurant_id, request.dish_id);
        self.store.save_changes(changes, cancel).await?;

        Ok(Outcome::success(()))
    }
}
