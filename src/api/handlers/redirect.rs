//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its original URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// Responds `302 Found` with `Cache-Control: no-cache`, so browsers come back for every
/// visit instead of caching the redirect.
///
/// # Errors
///
/// - `404 Not Found` if the slug was never issued
/// - `500 Internal Server Error` if the slug is not a canonical base62 id or the store fails
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.shortener.resolve(&slug).await?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, original_url),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
    ))
}
