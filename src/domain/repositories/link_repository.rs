//! Repository trait for short link data access.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable store for short links.
///
/// Every operation is atomic with respect to a single code, and a write is
/// visible to subsequent [`get`](LinkRepository::get) calls once it returns.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] when the store cannot be reached
    /// and [`AppError::Internal`] on other database errors.
    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    async fn create(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError>;

    /// Replaces the target URL of an existing link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    async fn update(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError>;

    /// Deletes a link together with its hits.
    ///
    /// Deleting an unknown code is not an error.
    async fn delete(&self, code: &str) -> Result<(), AppError>;

    /// Deletes every link created before `cutoff`, together with its hits.
    ///
    /// Returns the number of links removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all stored links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks store connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
