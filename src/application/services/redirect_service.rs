//! Redirect resolution: cache first, durable store on miss.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::hit_worker::HitRecorder;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Writes `code → target_url` to the cache on a detached task.
///
/// The caller never waits for it and a failure is only logged. The task
/// outlives the request that triggered it.
pub fn spawn_cache_refill(cache: Arc<dyn CacheService>, code: String, target_url: String, ttl: Duration) {
    tokio::spawn(async move {
        if let Err(e) = cache.set_url(&code, &target_url, ttl).await {
            metrics::counter!("cache_errors_total").increment(1);
            tracing::warn!(code = %code, error = %e, "Cache refill failed");
        }
    });
}

/// Resolves short codes to target URLs.
///
/// # Request Flow
///
/// 1. Look the code up in the cache; on a hit, queue a hit event and return
/// 2. On a miss (or a cache failure) read the durable store
/// 3. Unknown code: [`AppError::NotFound`], no hit recorded
/// 4. Known code: refill the cache in the background, queue a hit event, return
///
/// Cache failures never reach the caller.
pub struct RedirectService<L: LinkRepository + ?Sized = dyn LinkRepository> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    hits: HitRecorder,
    cache_ttl: Duration,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    /// Creates a redirect service over the store, the cache and the hit queue.
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<dyn CacheService>,
        hits: HitRecorder,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            link_repository,
            cache,
            hits,
            cache_ttl,
        }
    }

    /// Returns the target URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes and store errors as-is.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                metrics::counter!("cache_hits_total").increment(1);
                self.hits.record(code);
                return Ok(url);
            }
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
            }
            Err(e) => {
                metrics::counter!("cache_errors_total").increment(1);
                tracing::warn!(code = %code, error = %e, "Cache lookup failed, falling back to store");
            }
        }

        let link = self
            .link_repository
            .get(code)
            .await?
            .ok_or_else(AppError::link_not_found)?;

        spawn_cache_refill(
            self.cache.clone(),
            link.code.clone(),
            link.target_url.clone(),
            self.cache_ttl,
        );
        self.hits.record(code);

        Ok(link.target_url)
    }
}
