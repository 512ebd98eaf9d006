//! Delete a restaurant and its dishes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{Outcome, RestaurantId};
use bistro_restaurants::RestaurantErrors;

use crate::data::{ChangeSet, RestaurantStore};
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRestaurant {
    pub id: RestaurantId,
}

impl Request for DeleteRestaurant {
    type Response = ();
    const NAME: &'static str = "DeleteRestaurant";
}

pub struct DeleteRestaurantHandler {
    store: Arc<dyn RestaurantStore>,
}

impl DeleteRestaurantHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<DeleteRestaurant> for DeleteRestaurantHandler {
    async fn handle(&self, request: &DeleteRestaurant, cancel: &CancellationToken) -> HandlerResult<()> {
        if self.store.find(request.id, cancel).await?.is_none() {
            return Ok(Outcome::failure(RestaurantErrors::not_found(request.id)));
        }

        let rows = self.store.save_changes(ChangeSet::new().delete(request.id), cancel).await?;
        tracing::debug!(restaurant_id = %request.id, rows, "restaurant deleted");

        Ok(Outcome::success(()))
    }
}
