//! In-process cache backed by moka.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    ttl: Duration,
}

/// Each entry lives for the TTL it was written with; an overwrite restarts it.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-process cache.
///
/// Used when Redis is not configured or unreachable at startup. Entries are
/// local to one process, so another instance's update is only seen after the
/// entry expires.
pub struct MemoryCache {
    inner: Cache<String, CachedUrl>,
}

impl MemoryCache {
    pub fn new(max_entries: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        debug!("MemoryCache initialized with max capacity: {}", max_entries);
        Self { inner }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        Ok(self.inner.get(short_code).await.map(|entry| entry.url))
    }

    async fn set_url(&self, short_code: &str, target_url: &str, ttl: Duration) -> CacheResult<()> {
        self.inner
            .insert(
                short_code.to_string(),
                CachedUrl {
                    url: target_url.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.inner.invalidate(short_code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_invalidate() {
        let cache = MemoryCache::new(100);

        assert_eq!(cache.get_url("abc123").await.unwrap(), None);

        cache
            .set_url("abc123", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://example.com")
        );

        cache.invalidate("abc123").await.unwrap();
        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new(100);

        cache
            .set_url("abc123", "https://old.example.com", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_url("abc123", "https://new.example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://new.example.com")
        );
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(100);

        cache
            .set_url("abc123", "https://example.com", Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = MemoryCache::new(100);

        cache
            .set_url("abc123", "https://example.com", Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_url("abc123", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.get_url("abc123").await.unwrap().is_some());
    }
}
