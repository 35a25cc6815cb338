//! Background persistence of redirect hits.
//!
//! The redirect path never waits on the hit log: [`HitRecorder::record`] does a
//! non-blocking `try_send` onto a bounded queue and [`run_hit_worker`] drains it,
//! writing up to `concurrency` events at a time and retrying transient store
//! failures. A full queue drops the event (counted in `hits_dropped_total`).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::HitRepository;
use crate::error::AppError;

/// Retries after the first failed insert.
const MAX_RETRIES: usize = 3;
const RETRY_BASE_MS: u64 = 50;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

/// Sending half of the hit queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HitRecorder {
    tx: mpsc::Sender<HitEvent>,
}

/// Creates the hit queue with room for `capacity` pending events.
pub fn hit_channel(capacity: usize) -> (HitRecorder, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (HitRecorder { tx }, rx)
}

impl HitRecorder {
    /// Queues a hit for `code` stamped with the current time.
    ///
    /// Returns `false` if the event was dropped.
    pub fn record(&self, code: &str) -> bool {
        self.send(HitEvent::now(code))
    }

    /// Queues an already-built event without waiting.
    pub fn send(&self, event: HitEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                metrics::counter!("hits_dropped_total").increment(1);
                tracing::warn!(code = %event.code, "Hit queue full, dropping hit");
                false
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("hits_dropped_total").increment(1);
                tracing::warn!(code = %event.code, "Hit worker stopped, dropping hit");
                false
            }
        }
    }

    /// Free slots left in the queue.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of events waiting to be persisted.
    pub fn pending(&self) -> usize {
        self.max_capacity() - self.available()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Drains the hit queue until every [`HitRecorder`] is dropped.
///
/// In-flight writes are awaited before returning, so dropping the senders and
/// awaiting this future flushes everything that was queued.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<HitEvent>,
    hits: Arc<dyn HitRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Hit worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let hits = hits.clone();

        tasks.spawn(async move {
            let _permit = permit;
            persist_hit(hits.as_ref(), event).await;
        });

        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                tracing::error!(error = %e, "Hit task panicked");
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "Hit task panicked");
        }
    }

    tracing::info!("Hit worker stopped");
}

async fn persist_hit(hits: &dyn HitRepository, event: HitEvent) {
    let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS)
        .max_delay(RETRY_MAX_DELAY)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::start(
        strategy,
        || hits.record(&event.code, event.occurred_at),
        |e: &AppError| e.is_transient(),
    )
    .await;

    match result {
        Ok(_) => {
            tracing::trace!(code = %event.code, "Hit recorded");
        }
        Err(e) => {
            metrics::counter!("hits_failed_total").increment(1);
            tracing::error!(code = %event.code, error = %e, "Failed to record hit");
        }
    }
}
