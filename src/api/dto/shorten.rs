//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL; must be an absolute http(s) URL.
    #[validate(length(min = 16, max = 4096, message = "URL must be 16 to 4096 characters long"))]
    #[validate(url(message = "Invalid URL format"))]
    #[validate(custom(function = "validate_http_scheme"))]
    pub url: String,
}

fn validate_http_scheme(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("scheme")
            .with_message("Only http and https URLs can be shortened".into())),
    }
}

/// Response with the full short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    #[serde(rename = "shortenURL")]
    pub shorten_url: String,
}
