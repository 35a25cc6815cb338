//! PostgreSQL implementation of the hit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::Hit;
use crate::domain::repositories::HitRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct HitRow {
    id: i64,
    link_code: String,
    created_at: DateTime<Utc>,
}

/// PostgreSQL repository for redirect hits.
///
/// Counting relies on the `(link_code, created_at)` index.
pub struct PgHitRepository {
    pool: Arc<PgPool>,
}

impl PgHitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HitRepository for PgHitRepository {
    async fn record(&self, code: &str, at: DateTime<Utc>) -> Result<Hit, AppError> {
        let row = sqlx::query_as::<_, HitRow>(
            r#"
            INSERT INTO hit_events (link_code, created_at)
            VALUES ($1, $2)
            RETURNING id, link_code, created_at
            "#,
        )
        .bind(code)
        .bind(at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Hit {
            id: row.id,
            link_code: row.link_code,
            created_at: row.created_at,
        })
    }

    async fn count_since(
        &self,
        code: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM hit_events
            WHERE link_code = $1 AND created_at > $2 AND created_at <= $3
            "#,
        )
        .bind(code)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM hit_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hit_events")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
