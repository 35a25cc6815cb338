//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ShortLinkRow {
    code: String,
    target_url: String,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink::new(row.code, row.target_url, row.created_at)
    }
}

/// PostgreSQL repository for short links.
///
/// Deletes remove the link's hits in the same transaction.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            "SELECT code, target_url, created_at FROM short_links WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn create(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (code, target_url)
            VALUES ($1, $2)
            RETURNING code, target_url, created_at
            "#,
        )
        .bind(code)
        .bind(target_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            UPDATE short_links
            SET target_url = $2
            WHERE code = $1
            RETURNING code, target_url, created_at
            "#,
        )
        .bind(code)
        .bind(target_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::from)
            .ok_or_else(AppError::link_not_found)
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM hit_events WHERE link_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM short_links WHERE code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let codes: Vec<String> = sqlx::query_scalar(
            "DELETE FROM short_links WHERE created_at < $1 RETURNING code",
        )
        .bind(cutoff)
        .fetch_all(&mut *tx)
        .await?;

        if !codes.is_empty() {
            sqlx::query("DELETE FROM hit_events WHERE link_code = ANY($1)")
                .bind(&codes)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(codes.len() as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
