//! Replace the details of an existing restaurant.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{FieldFailure, Outcome, RestaurantId};
use bistro_restaurants::{RestaurantDetails, RestaurantErrors};

use super::rules;
use crate::data::{ChangeSet, RestaurantStore};
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;
use crate::validation::{Failures, Validator};

/// Full replace of every mutable field. `details.address = None` clears a
/// stored address. Dishes are not touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRestaurant {
    pub id: RestaurantId,
    pub details: RestaurantDetails,
}

impl Request for UpdateRestaurant {
    type Response = ();
    const NAME: &'static str = "UpdateRestaurant";
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateRestaurantValidator;

impl Validator<UpdateRestaurant> for UpdateRestaurantValidator {
    fn validate(&self, request: &UpdateRestaurant) -> Vec<FieldFailure> {
        let mut f = Failures::new();
        rules::details(&mut f, &request.details);
        f.into_vec()
    }
}

pub struct UpdateRestaurantHandler {
    store: Arc<dyn RestaurantStore>,
}

impl UpdateRestaurantHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateRestaurant> for UpdateRestaurantHandler {
    async fn handle(&self, request: &UpdateRestaurant, cancel: &CancellationToken) -> HandlerResult<()> {
        if self.store.find(request.id, cancel).await?.is_none() {
            return Ok(Outcome::failure(RestaurantErrors::not_found(request.id)));
        }

        let changes = ChangeSet::new().update_details(request.id, request.details.clone());
        self.store.save_changes(changes, cancel).await?;

        Ok(Outcome::success(()))
    }
}
