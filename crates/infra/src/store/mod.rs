//! `RestaurantStore` adapters.
//!
//! - `InMemoryRestaurantStore`: process-local, for tests/dev
//! - `PostgresRestaurantStore`: sqlx/Postgres, with schema bootstrap

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryRestaurantStore;
pub use postgres::PostgresRestaurantStore;
