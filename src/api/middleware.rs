//! API Middleware
//!
//! Shared-secret authentication, request logging and panic recovery.

use std::any::Any;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;

use super::AppState;

/// Header carrying the shared secret
pub const SECRET_KEY_HEADER: &str = "x-secret-key";

/// Header carrying the request correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// =========================================================================
// Shared-secret authentication
// =========================================================================

/// Compare two secrets by digest, so the comparison does not stop at the
/// first differing byte of the secret itself.
pub fn secret_matches(presented: &[u8], expected: &[u8]) -> bool {
    Sha256::digest(presented) == Sha256::digest(expected)
}

/// Reject requests whose `x-secret-key` header does not match the configured secret
pub async fn require_secret_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = headers
        .get(SECRET_KEY_HEADER)
        .is_some_and(|key| secret_matches(key.as_bytes(), state.config.secret_key.as_bytes()));

    if !authorized {
        tracing::warn!(
            method = %request.method(),
            uri = %request.uri(),
            "Rejected request with missing or invalid secret key"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    SECRET_KEY_HEADER,
    "authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let start = std::time::Instant::now();

    tracing::debug!(
        method = %method,
        uri = %uri,
        correlation_id = %correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = %correlation_id,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

// =========================================================================
// Panic recovery
// =========================================================================

/// Turn a handler panic into a generic 500 without leaking its message
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
