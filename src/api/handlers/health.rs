//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /api/v1/healthz`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "guardian": { "status": "ok", "message": "41230 entries, last refresh 2025-03-01T10:00:00Z" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let guardian_check = check_guardian(&state).await;

    let all_healthy = db_check.is_ok() && guardian_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            guardian: guardian_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    if state.url_repository.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Database connection failed")
    }
}

/// An empty blocklist is reported but not treated as a failure.
async fn check_guardian(state: &AppState) -> CheckStatus {
    match state.guardian.status().await {
        Ok(status) => {
            let refreshed = status
                .last_updated_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            CheckStatus::ok(format!(
                "{} entries, last refresh {}",
                status.entries, refreshed
            ))
        }
        Err(e) => CheckStatus::error(format!("Blocklist unavailable: {e}")),
    }
}
