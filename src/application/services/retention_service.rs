//! Periodic deletion of expired links and hits.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::MissedTickBehavior;

use crate::domain::repositories::{HitRepository, LinkRepository};

/// Outcome of one sweep. `None` means that job failed and was logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub links_deleted: Option<u64>,
    pub hits_deleted: Option<u64>,
}

impl SweepReport {
    /// True if both jobs ran to completion.
    pub fn is_complete(&self) -> bool {
        self.links_deleted.is_some() && self.hits_deleted.is_some()
    }
}

/// Background janitor enforcing link and hit retention.
///
/// Two independent jobs per run: links older than the link retention window are
/// deleted together with their hits, then hits older than the hit retention
/// window are deleted regardless of their link's age. A failing job is logged
/// and does not stop the other one or later runs. Deletes are idempotent, so
/// concurrent sweeps from several instances are harmless.
pub struct RetentionService<
    L: LinkRepository + ?Sized = dyn LinkRepository,
    H: HitRepository + ?Sized = dyn HitRepository,
> {
    link_repository: Arc<L>,
    hit_repository: Arc<H>,
    link_retention: Duration,
    hit_retention: Duration,
}

impl<L: LinkRepository + ?Sized, H: HitRepository + ?Sized> RetentionService<L, H> {
    /// Creates a sweeper with separate link and hit retention windows.
    pub fn new(
        link_repository: Arc<L>,
        hit_repository: Arc<H>,
        link_retention: Duration,
        hit_retention: Duration,
    ) -> Self {
        Self {
            link_repository,
            hit_repository,
            link_retention,
            hit_retention,
        }
    }

    /// Runs both cleanup jobs once.
    pub async fn run_once(&self) -> SweepReport {
        self.run_once_at(Utc::now()).await
    }

    /// Runs both cleanup jobs as if the current time were `now`.
    pub async fn run_once_at(&self, now: DateTime<Utc>) -> SweepReport {
        let links_deleted = match cutoff(now, self.link_retention) {
            Some(cutoff) => match self.link_repository.delete_older_than(cutoff).await {
                Ok(count) => {
                    tracing::info!(count, %cutoff, "Expired links deleted");
                    Some(count)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Link cleanup failed");
                    None
                }
            },
            None => Some(0),
        };

        let hits_deleted = match cutoff(now, self.hit_retention) {
            Some(cutoff) => match self.hit_repository.delete_older_than(cutoff).await {
                Ok(count) => {
                    tracing::info!(count, %cutoff, "Expired hits deleted");
                    Some(count)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Hit cleanup failed");
                    None
                }
            },
            None => Some(0),
        };

        SweepReport {
            links_deleted,
            hits_deleted,
        }
    }

    /// Sweeps every `interval` until `shutdown` resolves.
    ///
    /// The first sweep starts immediately.
    pub async fn run<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = interval.as_secs(), "Retention sweeper started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let report = self.run_once().await;
                    if !report.is_complete() {
                        tracing::warn!(?report, "Sweep finished with errors");
                    }
                }
            }
        }

        tracing::info!("Retention sweeper stopped");
    }
}

/// `now - retention`, or `None` when the window reaches before representable time.
fn cutoff(now: DateTime<Utc>, retention: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(retention)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
}
