//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`                - Short URL redirect
//! - `POST /api/v1/shortened-url`  - Create a short URL
//! - `GET  /api/v1/healthz`        - Health check: database, guardian
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - A panicking handler yields `500` instead of a dropped connection
//! - **Body limit** - Request bodies above 1 MiB are rejected with `413`
//! - **Rate limiting** - Per-IP token bucket, 30 requests per minute
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Routes without state, rate limiting or path normalization.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(redirect_handler))
        .nest("/api/v1", api::routes::v1_routes())
}

/// Router with state and every middleware except the rate limiter.
///
/// The rate limiter keys on the peer address, which only exists when the router is served
/// with connect info; this variant is what in-process tests drive.
pub fn router(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::new())
        .layer(tracing::layer())
}

/// Constructs the production router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(rate_limit::layer())
        .layer(CatchPanicLayer::new())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
