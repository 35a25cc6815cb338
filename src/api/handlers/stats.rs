//! Handler for the 24-hour statistics endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of redirects for a code in the last 24 hours.
///
/// # Endpoint
///
/// `GET /urls/{code}/stats`
///
/// # Response
///
/// ```json
/// { "redirects_in_24_hours": 42 }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let redirects_in_24_hours = state.stats_service.redirects_in_24_hours(&code).await?;

    Ok(Json(StatsResponse {
        redirects_in_24_hours,
    }))
}
