//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Short links (code → target URL)
//! - [`HitRepository`] - Redirect hit log
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod hit_repository;
pub mod link_repository;

pub use hit_repository::HitRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use hit_repository::MockHitRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
