//! `bistro-core`: shared building blocks.
//!
//! This crate contains the success/failure model every request handler
//! returns, the error catalog, and strongly-typed identifiers. No IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod outcome;
pub mod value_object;

pub use entity::Entity;
pub use error::{Error, ErrorKind, FieldFailure, Rule};
pub use id::{DishId, InvalidId, RestaurantId};
pub use outcome::Outcome;
pub use value_object::ValueObject;
