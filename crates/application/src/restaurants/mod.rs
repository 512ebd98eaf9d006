//! Restaurant use cases: commands, queries, validators and handlers.

use std::sync::Arc;

use crate::data::RestaurantStore;
use crate::dispatcher::{DispatchError, Dispatcher, DispatcherBuilder};

pub mod create;
pub mod delete;
pub mod dishes;
pub mod get;
pub mod get_by_id;
pub mod response;
mod rules;
pub mod update;

pub use create::{CreateRestaurant, CreateRestaurantHandler, CreateRestaurantValidator, NewDish};
pub use delete::{DeleteRestaurant, DeleteRestaurantHandler};
pub use dishes::{AddDish, AddDishHandler, AddDishValidator, RemoveDish, RemoveDishHandler};
pub use get::{GetRestaurants, GetRestaurantsHandler};
pub use get_by_id::{GetRestaurantById, GetRestaurantByIdHandler};
pub use response::{AddressResponse, DishResponse, RestaurantResponse};
pub use update::{UpdateRestaurant, UpdateRestaurantHandler, UpdateRestaurantValidator};

/// Wire every restaurant handler and validator against `store`.
pub fn register(builder: DispatcherBuilder, store: Arc<dyn RestaurantStore>) -> DispatcherBuilder {
    builder
        .handler::<CreateRestaurant, _>(CreateRestaurantHandler::new(store.clone()))
        .validator::<CreateRestaurant, _>(CreateRestaurantValidator)
        .handler::<GetRestaurants, _>(GetRestaurantsHandler::new(store.clone()))
        .handler::<GetRestaurantById, _>(GetRestaurantByIdHandler::new(store.clone()))
        .handler::<UpdateRestaurant, _>(UpdateRestaurantHandler::new(store.clone()))
        .validator::<UpdateRestaurant, _>(UpdateRestaurantValidator)
        .handler::<DeleteRestaurant, _>(DeleteRestaurantHandler::new(store.clone()))
        .handler::<AddDish, _>(AddDishHandler::new(store.clone()))
        .validator::<AddDish, _>(AddDishValidator)
        .handler::<RemoveDish, _>(RemoveDishHandler::new(store))
}

/// Fail fast at startup if any restaurant request cannot be dispatched.
pub fn ensure_registered(dispatcher: &Dispatcher) -> Result<(), DispatchError> {
    dispatcher.ensure_registered::<CreateRestaurant>()?;
    dispatcher.ensure_registered::<GetRestaurants>()?;
    dispatcher.ensure_registered::<GetRestaurantById>()?;
    dispatcher.ensure_registered::<UpdateRestaurant>()?;
    dispatcher.ensure_registered::<DeleteRestaurant>()?;
    dispatcher.ensure_registered::<AddDish>()?;
    dispatcher.ensure_registered::<RemoveDish>()?;
    Ok(())
}
