//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries are
//! checked at runtime, so building needs neither a live database nor offline
//! query data.
//!
//! - [`PgLinkRepository`] - Short link storage
//! - [`PgHitRepository`] - Redirect hit log

pub mod pg_hit_repository;
pub mod pg_link_repository;

pub use pg_hit_repository::PgHitRepository;
pub use pg_link_repository::PgLinkRepository;
