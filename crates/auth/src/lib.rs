//! `bistro-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod roles;
pub mod users;

pub use authorize::{AuthzError, require_role};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, IssuedToken, JwtIssuer, JwtSettings, JwtValidator, TokenError};
pub use roles::Role;
pub use users::{AuthenticatedUser, InMemoryUserDirectory};
