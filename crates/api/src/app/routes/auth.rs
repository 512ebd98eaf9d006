use std::sync::Arc;

use axum::{Extension, Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Exchange credentials for a bearer token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let Some(user) = services.users().authenticate(&body.username, &body.password) else {
        tracing::info!(username = %body.username, "login rejected");
        return errors::unauthorized("Invalid username or password.");
    };

    let issued = match services
        .issuer()
        .issue(&user.username, vec![user.role.clone()], Utc::now())
    {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "an unexpected error occurred",
            );
        }
    };

    tracing::info!(username = %user.username, role = %user.role, "login succeeded");

    Json(dto::LoginResponse {
        username: user.username,
        role: user.role.to_string(),
        token: issued.token,
    })
    .into_response()
}
