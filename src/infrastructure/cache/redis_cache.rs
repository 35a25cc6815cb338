//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache for fast URL lookups.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. Every command
/// is bounded by `timeout`; a slow or unreachable server yields
/// [`CacheError::Timeout`] instead of stalling the redirect.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
    timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379/1"`)
    /// - `key_prefix` - Namespace for keys (`CACHE_KEY_PREFIX`, default `url_`)
    /// - `timeout` - Per-command timeout (`CACHE_TIMEOUT_MS`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, key_prefix: &str, timeout: Duration) -> CacheResult<Self> {
        info!(
            "Connecting to Redis at {}",
            crate::config::mask_connection_string(redis_url)
        );

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = tokio::time::timeout(timeout * 10, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(timeout * 10))?
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let cache = Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
            timeout,
        };

        let mut conn = cache.client.clone();
        cache
            .bounded(conn.ping::<()>())
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(cache)
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }

    async fn bounded<T, F>(&self, command: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::Operation(e.to_string())),
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let url = self.bounded(conn.get::<_, Option<String>>(&key)).await?;
        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", short_code, url),
            None => debug!("Cache MISS: {}", short_code),
        }
        Ok(url)
    }

    async fn set_url(&self, short_code: &str, target_url: &str, ttl: Duration) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        self.bounded(conn.set_ex::<_, _, ()>(&key, target_url, ttl_seconds))
            .await?;
        debug!(
            "Cache SET: {} -> {} (TTL: {}s)",
            short_code, target_url, ttl_seconds
        );
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let deleted = self.bounded(conn.del::<_, i32>(&key)).await?;
        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        self.bounded(conn.ping::<()>()).await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
