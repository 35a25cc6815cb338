//! Hit entity: one persisted redirect occurrence.

use chrono::{DateTime, Utc};

/// A recorded redirect for a short code.
///
/// Append-only. `link_code` is not guaranteed to reference a live link: hits may
/// briefly outlive their link until the next sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: i64,
    pub link_code: String,
    pub created_at: DateTime<Utc>,
}
