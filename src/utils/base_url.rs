//! Public base URL resolution for generated short links.

use axum::http::{HeaderMap, header};

/// Header set by reverse proxies terminating TLS.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Resolves the base that `url_short` values are built on.
///
/// A configured base always wins. Otherwise the base is derived from the
/// request: scheme from `X-Forwarded-Proto` (default `http`) and authority from
/// `Host`. Falls back to `http://localhost` when `Host` is missing or invalid.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// assert_eq!(resolve_base_url(None, &headers), "http://s.example.com:8080");
/// ```
pub fn resolve_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| *v == "http" || *v == "https")
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}

/// Builds the full redirect URL for `code`.
pub fn short_url(base: &str, code: &str) -> String {
    format!("{}/urls/{}", base.trim_end_matches('/'), code)
}
