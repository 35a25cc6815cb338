//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /urls/{code}`
///
/// Resolution goes through [`crate::application::services::RedirectService`]:
/// cache first, durable store on a miss. A hit is queued for statistics without
/// delaying the response.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let target_url = state.redirect_service.resolve(&code).await?;
    Ok(Redirect::temporary(&target_url))
}
