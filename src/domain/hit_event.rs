//! Hit event model for asynchronous hit recording.

use chrono::{DateTime, Utc};

/// A redirect that still has to be persisted.
///
/// Passed from the redirect path to [`crate::domain::hit_worker::run_hit_worker`]
/// over a bounded channel. The timestamp is taken when the redirect happens, not
/// when the worker gets to it, so queueing delay never shifts a hit across the
/// 24-hour window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub code: String,
    pub occurred_at: DateTime<Utc>,
}

impl HitEvent {
    pub fn new(code: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            occurred_at,
        }
    }

    /// Creates an event stamped with the current time.
    pub fn now(code: impl Into<String>) -> Self {
        Self::new(code, Utc::now())
    }
}
