mod common;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use short::domain::repositories::HitRepository;
use short::infrastructure::persistence::PgHitRepository;

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_hit(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgHitRepository::new(Arc::new(pool));
    let at = Utc::now() - Duration::minutes(5);

    let hit = repo.record("abc123", at).await.unwrap();

    assert_eq!(hit.link_code, "abc123");
    assert_eq!(hit.created_at.timestamp_micros(), at.timestamp_micros());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_count_since_window(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    common::create_test_link(&pool, "other1", "https://example.org").await;
    common::create_aged_hit(&pool, "abc123", 25).await;
    common::create_aged_hit(&pool, "abc123", 23).await;
    common::create_aged_hit(&pool, "abc123", 0).await;
    common::create_aged_hit(&pool, "other1", 0).await;
    let repo = PgHitRepository::new(Arc::new(pool));

    let now = Utc::now();
    let count = repo
        .count_since("abc123", now - Duration::hours(24), now)
        .await
        .unwrap();

    assert_eq!(count, 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_older_than(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    common::create_aged_hit(&pool, "abc123", 48).await;
    common::create_aged_hit(&pool, "abc123", 30).await;
    common::create_aged_hit(&pool, "abc123", 1).await;
    let repo = PgHitRepository::new(Arc::new(pool));

    let deleted = repo
        .delete_older_than(Utc::now() - Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(repo.count().await.unwrap(), 1);
}

/// Records hits just outside, on and inside both window edges and counts
/// `(from, to]`.
async fn assert_window_bounds(repo: &dyn HitRepository) {
    let to = Utc::now().trunc_subsecs(6);
    let from = to - Duration::hours(24);
    let tick = Duration::microseconds(1);

    let at: [DateTime<Utc>; 5] = [from - tick, from, from + tick, to, to + tick];
    for t in at {
        repo.record("abc123", t).await.unwrap();
    }

    assert_eq!(repo.count_since("abc123", from, to).await.unwrap(), 2);
    assert_eq!(repo.count_since("abc123", from - tick, to).await.unwrap(), 3);
    assert_eq!(repo.count_since("abc123", from, to + tick).await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_count_since_bounds(pool: PgPool) {
    common::create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgHitRepository::new(Arc::new(pool));

    assert_window_bounds(&repo).await;
}

#[tokio::test]
async fn test_count_since_bounds_in_memory() {
    let repo = common::MemoryHits(common::MemoryStore::new());

    assert_window_bounds(&repo).await;
}
