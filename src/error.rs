// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::session::SessionError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., confirming a session that is already being graded)
    Conflict(String),

    // 502 Bad Gateway (the communities API failed or answered nonsense)
    Upstream(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `reqwest::Error` into `AppError::Upstream`.
/// Allows using `?` operator on calls to the communities API.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Upstream(format!("Malformed upstream payload: {}", err))
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

/// Guard violations of the quiz session map onto client errors.
impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownQuestion(_) | SessionError::InvalidOption { .. } => {
                AppError::BadRequest(err.to_string())
            }
            SessionError::NotActive(_) | SessionError::NotOnLastQuestion | SessionError::NotGraded => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}
