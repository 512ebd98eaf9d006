//! Restaurants domain module.
//!
//! Restaurants, their dishes and their address, as plain in-memory entities.
//! Persistence and request handling live in other crates.

pub mod errors;
pub mod limits;
pub mod restaurant;

pub use errors::RestaurantErrors;
pub use restaurant::{Address, Dish, Restaurant, RestaurantDetails};
