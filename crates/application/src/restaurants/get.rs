//! List every restaurant with its dishes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::Outcome;

use super::response::RestaurantResponse;
use crate::data::RestaurantStore;
use crate::handler::{HandlerResult, RequestHandler};
use crate::request::Request;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GetRestaurants;

impl Request for GetRestaurants {
    type Response = Vec<RestaurantResponse>;
    const NAME: &'static str = "GetRestaurants";
}

pub struct GetRestaurantsHandler {
    store: Arc<dyn RestaurantStore>,
}

impl GetRestaurantsHandler {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetRestaurants> for GetRestaurantsHandler {
    async fn handle(&self, _request: &GetRestaurants, cancel: &CancellationToken) -> HandlerResult<Vec<RestaurantResponse>> {
        let restaurants = self.store.all(cancel).await?;
        Ok(Outcome::success(restaurants.iter().map(RestaurantResponse::from).collect()))
    }
}
