//! Maximum lengths (in characters) of stored text columns, plus the
//! largest storable dish price.
//!
//! Shared by request validators and the Postgres schema.

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const CATEGORY_MAX: usize = 50;
pub const CONTACT_EMAIL_MAX: usize = 255;
pub const CONTACT_NUMBER_MAX: usize = 20;

pub const CITY_MAX: usize = 100;
pub const STREET_MAX: usize = 200;
pub const POSTAL_CODE_MAX: usize = 20;

pub const DISH_NAME_MAX: usize = 100;
pub const DISH_DESCRIPTION_MAX: usize = 500;

/// Prices live in a `BIGINT` column.
pub const PRICE_MAX: u64 = i64::MAX as u64;
