//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/urls/*`     - Short link API and redirects
//! - `GET /livez`  - Liveness probe
//! - `GET /healthz`- Readiness probe (database)
//! - `GET /health` - Detailed component health
//! - `GET /http_error` - Always 500 (debug mode only)
//!
//! Unknown paths get the JSON error envelope with 404, unsupported methods on
//! known paths the same envelope with 405.

use crate::api;
use crate::api::handlers::{method_not_allowed_handler, not_found_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and the tracing layer, but without path
/// normalization. Used directly by HTTP tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::url_routes())
        .merge(api::routes::probe_routes(state.debug))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with trailing slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
