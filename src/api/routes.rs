//! Versioned API route configuration.

use crate::api::handlers::{health_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /shortened-url` - Create a short URL
/// - `GET  /healthz`       - Component health
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/shortened-url", post(shorten_handler))
        .route("/healthz", get(health_handler))
}
