//! Infrastructure layer: restaurant store adapters and sample data.

pub mod seed;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use seed::seed_sample_data;
pub use store::{InMemoryRestaurantStore, PostgresRestaurantStore};
