//! Liveness, readiness and diagnostic endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /livez`: the process is up. Never touches a dependency.
pub async fn livez_handler() -> Json<&'static str> {
    Json("OK")
}

/// `GET /healthz`: the durable store answers.
///
/// # Errors
///
/// Returns 503 Service Unavailable when the store cannot be reached.
pub async fn healthz_handler(State(state): State<AppState>) -> Result<Json<&'static str>, AppError> {
    match state.link_service.check_store().await {
        Ok(()) => Ok(Json("OK")),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(AppError::service_unavailable("Database unavailable"))
        }
    }
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Database reachable
/// - **503 Service Unavailable**: Database unreachable
///
/// The cache and the hit queue are reported but do not fail the check: the
/// service keeps redirecting without them.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 12 links" },
///     "hit_queue": { "status": "ok", "message": "Pending: 0 / 10000" },
///     "cache": { "status": "ok", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let hit_queue = check_hit_queue(&state);
    let cache = check_cache(&state).await;

    let healthy = database.is_ok();
    let degraded = !hit_queue.is_ok() || !cache.is_ok();

    let status = match (healthy, degraded) {
        (false, _) => "unhealthy",
        (true, true) => "degraded",
        (true, false) => "healthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            hit_queue,
            cache,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.count_links().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {} links", count)),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_hit_queue(state: &AppState) -> CheckStatus {
    let recorder = &state.hit_recorder;

    if recorder.is_closed() {
        CheckStatus::error("Hit queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Pending: {} / {}",
            recorder.pending(),
            recorder.max_capacity()
        ))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();

    if state.cache.health_check().await {
        CheckStatus::ok(format!("{} connected", backend))
    } else {
        CheckStatus::error(format!("{} unreachable", backend))
    }
}

/// `GET /http_error`: always fails with 500. Only routed in debug mode.
pub async fn http_error_handler() -> AppError {
    AppError::internal(
        "Debug error endpoint",
        json!({ "reason": "triggered via /http_error" }),
    )
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> AppError {
    AppError::not_found("Not Found")
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::method_not_allowed()
}
