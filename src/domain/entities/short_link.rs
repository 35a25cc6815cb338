//! Short link entity: the authoritative code → target URL mapping.

use chrono::{DateTime, Duration, Utc};

/// A short code and the URL it redirects to.
///
/// `code` is immutable once created; `target_url` may be overwritten by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    pub fn new(code: String, target_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            target_url,
            created_at,
        }
    }

    /// Returns true if the link is older than `retention` at `now`.
    pub fn is_expired_at(&self, retention: Duration, now: DateTime<Utc>) -> bool {
        self.created_at < now - retention
    }
}
