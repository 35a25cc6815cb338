//! Repository trait for the redirect hit log.

use crate::domain::entities::Hit;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only log of redirect hits used for windowed counting.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgHitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HitRepository: Send + Sync {
    /// Appends one hit for `code` at `at`.
    ///
    /// Does not deduplicate and does not check that the code exists.
    async fn record(&self, code: &str, at: DateTime<Utc>) -> Result<Hit, AppError>;

    /// Counts hits for `code` with `from < created_at <= to`.
    async fn count_since(
        &self,
        code: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Deletes every hit recorded before `cutoff`, regardless of its link.
    ///
    /// Returns the number of hits removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Total number of stored hits.
    async fn count(&self) -> Result<i64, AppError>;
}
