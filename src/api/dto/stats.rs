//! DTOs for the statistics endpoint.

use serde::{Deserialize, Serialize};

/// Redirect count over the last 24 hours.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub redirects_in_24_hours: i64,
}
