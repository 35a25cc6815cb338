//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, health_handler, healthz_handler, http_error_handler,
    livez_handler, redirect_handler, stats_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short link routes.
///
/// # Endpoints
///
/// - `POST   /urls`               - Create a short link
/// - `GET    /urls/{code}`        - Redirect (307)
/// - `PUT    /urls/{code}`        - Replace the target URL
/// - `DELETE /urls/{code}`        - Delete link and statistics
/// - `GET    /urls/{code}/stats`  - Redirects in the last 24 hours
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route(
            "/urls/{code}",
            get(redirect_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/urls/{code}/stats", get(stats_handler))
}

/// Probe routes. `/http_error` is only present when `debug` is set.
pub fn probe_routes(debug: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/livez", get(livez_handler))
        .route("/healthz", get(healthz_handler))
        .route("/health", get(health_handler));

    if debug {
        router.route("/http_error", get(http_error_handler))
    } else {
        router
    }
}
