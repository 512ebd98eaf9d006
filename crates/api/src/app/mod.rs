//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, dispatcher, users, token issuer
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and mapping onto commands
//! - `errors.rs`: outcome and fault to response mapping

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use bistro_auth::{Hs256JwtValidator, JwtSettings};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, StartupError, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>, jwt: &JwtSettings) -> Router {
    let auth_state = middleware::AuthState {
        jwt: Arc::new(Hs256JwtValidator::new(jwt)),
    };

    // Protected routes: valid token, then the Admin role.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(axum::middleware::from_fn(middleware::require_admin)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(Extension(services))
}
