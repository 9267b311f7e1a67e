//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{hash}`      - Short link redirect
//! - `GET  /`            - Rejected: hash required
//! - `GET  /health`      - Health check
//! - `/api/v1/*`         - Link management API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured origins, or mirror any origin
//! - **Timeout** - Per-request deadline
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, missing_hash_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Routes with state attached and no middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(missing_hash_handler))
        .route("/health", get(health_handler))
        .route("/{hash}", get(redirect_handler))
        .nest("/api/v1", api::routes::link_routes())
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - allowed origins; empty mirrors the request origin
/// - `request_timeout` - deadline after which a request gets 408
pub fn app_router(
    state: AppState,
    cors_origins: &[String],
    request_timeout: Duration,
) -> NormalizePath<Router> {
    let router = router(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors::layer(cors_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
