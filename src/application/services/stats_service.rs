//! Redirect statistics over a rolling 24-hour window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::repositories::{HitRepository, LinkRepository};
use crate::error::AppError;

/// Width of the statistics window.
pub const STATS_WINDOW_HOURS: i64 = 24;

/// Service answering "how many redirects did this code get recently".
///
/// Counts come straight from the hit log; hits still queued in the background
/// worker are not yet visible.
pub struct StatsService<
    H: HitRepository + ?Sized = dyn HitRepository,
    L: LinkRepository + ?Sized = dyn LinkRepository,
> {
    hit_repository: Arc<H>,
    link_repository: Arc<L>,
}

impl<H: HitRepository + ?Sized, L: LinkRepository + ?Sized> StatsService<H, L> {
    /// Creates a new statistics service.
    pub fn new(hit_repository: Arc<H>, link_repository: Arc<L>) -> Self {
        Self {
            hit_repository,
            link_repository,
        }
    }

    /// Counts redirects for `code` in `(now - 24h, now]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn redirects_in_24_hours(&self, code: &str) -> Result<i64, AppError> {
        self.redirects_in_window_at(code, Utc::now()).await
    }

    /// Counts redirects for `code` in the 24 hours ending at `now`.
    pub async fn redirects_in_window_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        if self.link_repository.get(code).await?.is_none() {
            return Err(AppError::link_not_found());
        }

        self.hit_repository
            .count_since(code, now - Duration::hours(STATS_WINDOW_HOURS), now)
            .await
    }
}
