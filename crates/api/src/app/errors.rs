use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bistro_application::DispatchError;
use bistro_core::{Error, ErrorKind, Outcome};

/// Map a dispatch result to a response: `on_success` for success outcomes,
/// [`outcome_error_to_response`] for failures, and
/// [`dispatch_error_to_response`] for faults.
pub fn respond<T>(
    result: Result<Outcome<T>, DispatchError>,
    on_success: impl FnOnce(T) -> axum::response::Response,
) -> axum::response::Response {
    match result {
        Ok(Outcome::Success(value)) => on_success(value),
        Ok(Outcome::Failure(error)) => outcome_error_to_response(&error),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Failure => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
    }
}

pub fn outcome_error_to_response(error: &Error) -> axum::response::Response {
    let status = status_for(error.kind());
    if error.kind() != ErrorKind::Validation {
        return json_error(status, error.code(), error.message());
    }

    let errors: Vec<_> = error
        .failures()
        .iter()
        .map(|f| {
            json!({
                "field": f.field,
                "rule": f.rule.to_string(),
                "message": f.message,
            })
        })
        .collect();

    (
        status,
        axum::Json(json!({
            "error": error.code(),
            "message": error.message(),
            "errors": errors,
        })),
    )
        .into_response()
}

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Cancelled => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "cancelled",
            "the request was cancelled",
        ),
        other => {
            tracing::error!(error = %other, "request failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "an unexpected error occurred",
            )
        }
    }
}

pub fn unauthorized(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, Error::UNAUTHORIZED.code(), message)
}

/// Malformed or mistyped JSON bodies keep axum's status (400, 415 or 422)
/// but use the common error shape.
pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn forbidden(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, Error::FORBIDDEN.code(), message)
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
