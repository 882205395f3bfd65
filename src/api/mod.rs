//! API module
//!
//! HTTP endpoints, shared state and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pending_store::PendingStore;

pub use routes::create_router;

/// State shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<PendingStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state with an empty store
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(PendingStore::new()),
            config: Arc::new(config),
        }
    }
}

/// Build the full application: routes plus the middleware stack
pub fn build_app(state: AppState) -> Router {
    with_middleware(create_router(state))
}

/// Wrap a router in request logging, panic recovery and HTTP tracing
pub fn with_middleware(router: Router) -> Router {
    // Note: Axum layers are applied in reverse order (last added = first executed)
    // Order: trace -> catch_panic -> logging -> routes
    router
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(TraceLayer::new_for_http())
}
