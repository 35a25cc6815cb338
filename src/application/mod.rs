//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the cache, and give HTTP handlers and
//! the admin CLI a small API.
//!
//! - [`services::link_service::LinkService`] - Code allocation and link lifecycle
//! - [`services::redirect_service::RedirectService`] - Cache-first redirect resolution
//! - [`services::stats_service::StatsService`] - 24-hour redirect counts
//! - [`services::retention_service::RetentionService`] - Retention sweeps

pub mod services;
