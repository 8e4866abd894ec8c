//! HTTP error type and its JSON rendering.
//!
//! Every failure leaving a handler is rendered as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::errors::ShortenerError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotAcceptable { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_acceptable(message: impl Into<String>, details: Value) -> Self {
        Self::NotAcceptable {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotAcceptable { message, details } => ("not_acceptable", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::MaliciousUrlDetected => {
                AppError::not_acceptable("Malicious URL detected", json!({}))
            }
            ShortenerError::ShortenedUrlNotFound => {
                AppError::not_found("Shortened URL not found", json!({}))
            }
            ShortenerError::IllegalSlug(e) => {
                AppError::internal("Illegal slug", json!({ "reason": e.to_string() }))
            }
            other => {
                error!(error = %other, "Request failed");
                AppError::internal("Internal server error", json!({}))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let problems: serde_json::Map<String, Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", Value::Object(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{AllocationError, StoreError};
    use crate::utils::slug_codec::SlugError;

    #[test]
    fn test_shortener_error_status_mapping() {
        let cases = [
            (ShortenerError::MaliciousUrlDetected, StatusCode::NOT_ACCEPTABLE),
            (ShortenerError::ShortenedUrlNotFound, StatusCode::NOT_FOUND),
            (
                ShortenerError::IllegalSlug(SlugError::Empty),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ShortenerError::Allocation(AllocationError("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ShortenerError::Store(StoreError::DuplicateKey("url_map_pkey".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::from(ShortenerError::Store(StoreError::Database(
            "password authentication failed".to_string(),
        )));

        let info = err.to_error_info();
        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("password"));
    }
}
