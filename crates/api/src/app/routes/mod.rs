use axum::Router;

pub mod auth;
pub mod restaurants;
pub mod system;

/// Router for all authenticated (admin-only) endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/restaurants", restaurants::router())
}
