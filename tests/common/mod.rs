//! Common test utilities

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use donation_relay::api::{self, AppState};
use donation_relay::Config;
use serde_json::Value;
use tower::util::ServiceExt;

/// Secret configured for every test router
pub const TEST_SECRET: &str = "test_secret_123";

/// Build the full application over a fresh, empty store
pub fn setup_app() -> (Router, AppState) {
    let config = Config {
        secret_key: TEST_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    };
    let state = AppState::new(config);
    (api::build_app(state.clone()), state)
}

/// Send a request and decode the JSON response body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_post_json(uri: &str, body: &Value) -> Request<Body> {
    let mut request = post_json(uri, body);
    request
        .headers_mut()
        .insert("x-secret-key", TEST_SECRET.parse().unwrap());
    request
}

pub fn poll(secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/donations");
    if let Some(secret) = secret {
        builder = builder.header("x-secret-key", secret);
    }
    builder.body(Body::empty()).unwrap()
}
