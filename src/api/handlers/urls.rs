//! Handlers for link management endpoints (create, update, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::api::dto::url::{UrlRequest, UrlResponse};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::{resolve_base_url, short_url};

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "url": "http://example.com/" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "url_short": "http://localhost:3000/urls/aB3xYz" }
/// ```
///
/// # Errors
///
/// Returns 422 Unprocessable Entity for malformed JSON or an invalid URL.
pub async fn create_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<UrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let link = state.link_service.create_short_link(&payload.url).await?;
    let base = resolve_base_url(state.base_url.as_deref(), &headers);

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse {
            url_short: short_url(&base, &link.code),
        }),
    ))
}

/// Points an existing short code at a new URL.
///
/// # Endpoint
///
/// `PUT /urls/{code}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown code and 422 for an invalid URL.
pub async fn update_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<UrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    let link = state.link_service.update_link(&code, &payload.url).await?;
    let base = resolve_base_url(state.base_url.as_deref(), &headers);

    Ok(Json(UrlResponse {
        url_short: short_url(&base, &link.code),
    }))
}

/// Deletes a short link and its statistics.
///
/// # Endpoint
///
/// `DELETE /urls/{code}`
///
/// Always returns `204 No Content`, also for codes that never existed.
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
