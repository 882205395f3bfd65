//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid body")]
    InvalidBody,

    #[error("Unauthorized")]
    Unauthorized,

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Body returned for every 5xx; details stay in the logs
    pub fn internal() -> Self {
        Self::new("Internal server error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // 400 Bad Request
            AppError::InvalidBody => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(self.to_string()))
            }

            // 403 Forbidden
            AppError::Unauthorized => {
                (StatusCode::FORBIDDEN, ErrorResponse::new(self.to_string()))
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal())
            }
        };

        (status, Json(body)).into_response()
    }
}
