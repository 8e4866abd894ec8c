//! Handler for the shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/v1/shortened-url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "shortenURL": "https://snip.to/2" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` if the URL fails validation (per-field problems in `details`)
/// - `406 Not Acceptable` if the URL is on the blocklist
/// - `500 Internal Server Error` on any infrastructure failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let shorten_url = state.shortener.shorten(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(ShortenResponse { shorten_url })))
}
