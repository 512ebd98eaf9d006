//! Fetch one restaurant by id.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{Outcome, RestaurantId};
use bistro_restaurants::RestaurantErrors;

use super::response::RestaurantResponse;
use crate::data::RestaurantStore;
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRestaurantById {
    pub id: RestaurantId,
}

impl Request for GetRestaurantById {
    type Response = RestaurantResponse;
    const NAME: &'static str = "GetRestaurantById";
}

pub struct GetRestaurantByIdHandler {
    store: Arc<dyn RestaurantStore>,
}

impl GetRestaurantByIdHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetRestaurantById> for GetRestaurantByIdHandler {
    async fn handle(&self, request: &GetRestaurantById, cancel: &CancellationToken) -> HandlerResult<RestaurantResponse> {
        let outcome = match self.store.find(request.id, cancel).await? {
            Some(restaurant) => Outcome::success(RestaurantResponse::from(&restaurant)),
            None => Outcome::failure(RestaurantErrors::not_found(request.id)),
        };
        Ok(outcome)
    }
}
