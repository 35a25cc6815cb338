mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use short::domain::repositories::LinkRepository;
use short::error::AppError;
use short::infrastructure::persistence::PgLinkRepository;

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.create("test123", "https://example.com").await.unwrap();

    assert_eq!(link.code, "test123");
    assert_eq!(link.target_url, "https://example.com");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    common::create_test_link(&pool, "dup123", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.create("dup123", "https://example.org").await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_get_link(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.get("abc123").await.unwrap();

    assert_eq!(link.unwrap().target_url, "https://example.com");
    assert!(repo.get("notfound").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_link(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://old.example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.update("abc123", "https://new.example.com").await.unwrap();

    assert_eq!(link.target_url, "https://new.example.com");
    assert_eq!(
        repo.get("abc123").await.unwrap().unwrap().target_url,
        "https://new.example.com"
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_unknown_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.update("nope12", "https://example.com").await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_link_removes_hits(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    common::create_aged_hit(&pool, "abc123", 1).await;
    common::create_aged_hit(&pool, "abc123", 2).await;
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    repo.delete("abc123").await.unwrap();
    repo.delete("abc123").await.unwrap();

    assert!(repo.get("abc123").await.unwrap().is_none());
    let hits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hit_events WHERE link_code = $1")
        .bind("abc123")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hits, 0);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_older_than(pool: PgPool) {
    common::create_aged_link(&pool, "old123", "https://old.example.com", 24 * 31).await;
    common::create_aged_hit(&pool, "old123", 1).await;
    common::create_test_link(&pool, "new123", "https://new.example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    let deleted = repo
        .delete_older_than(Utc::now() - Duration::days(30))
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(repo.get("old123").await.unwrap().is_none());
    assert!(repo.get("new123").await.unwrap().is_some());

    let hits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hit_events WHERE link_code = $1")
        .bind("old123")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hits, 0);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_count_and_ping(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    common::create_test_link(&pool, "def456", "https://example.org").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert_eq!(repo.count().await.unwrap(), 2);
    assert!(repo.ping().await.is_ok());
}
