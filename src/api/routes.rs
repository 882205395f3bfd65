//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::Donation;
use crate::error::{AppError, AppResult};

use super::middleware::require_secret_key;
use super::AppState;

/// Message reported by the health endpoint
pub const HEALTH_MESSAGE: &str = "Donation relay - Running!";

// =========================================================================
// Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub success: bool,
    pub queued: Donation,
}

impl QueuedResponse {
    fn new(donation: Donation) -> Self {
        Self {
            success: true,
            queued: donation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue: usize,
    pub message: &'static str,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Secret-key check runs only for matched protected routes
    let protected_routes = Router::new()
        .route("/donations", get(poll_donations))
        .route("/test", post(inject_test_donation))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_secret_key,
        ));

    Router::new()
        .route("/", get(health))
        .route("/webhook", post(receive_webhook))
        .merge(protected_routes)
        .with_state(state)
}

// =========================================================================
// POST /webhook
// =========================================================================

/// Receive a donation from the producer
async fn receive_webhook(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<QueuedResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(reason = %rejection.body_text(), "Rejected webhook body");
        AppError::InvalidBody
    })?;

    let Value::Object(payload) = body else {
        tracing::warn!("Rejected webhook body that is not a JSON object");
        return Err(AppError::InvalidBody);
    };

    tracing::debug!(payload = ?payload, "Webhook received");

    let submission = state.store.submit(&payload);

    Ok(Json(QueuedResponse::new(submission.donation)))
}

// =========================================================================
// GET /donations
// =========================================================================

/// Hand every pending donation to the poller and clear the queue
async fn poll_donations(State(state): State<AppState>) -> Json<Vec<Donation>> {
    Json(state.store.drain_all())
}

// =========================================================================
// POST /test
// =========================================================================

/// Queue a manual test donation
async fn inject_test_donation(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<QueuedResponse>> {
    // An empty body or a non-object value falls back to test defaults
    let fields = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => Map::new(),
            Err(e) => {
                tracing::warn!(reason = %e, "Rejected test donation body");
                return Err(AppError::InvalidBody);
            }
        }
    };

    Ok(Json(QueuedResponse::new(state.store.inject_test(&fields))))
}

// =========================================================================
// GET /
// =========================================================================

/// Health check with current queue length
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        queue: state.store.len(),
        message: HEALTH_MESSAGE,
    })
}
