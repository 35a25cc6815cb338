//! Link allocation, creation, update and deletion.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::redirect_service::spawn_cache_refill;
use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_target_url;
use serde_json::json;

/// Upper bound on generate-and-check rounds for one allocation, and on
/// insert attempts that lose a uniqueness race.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 32;

/// Service for creating and maintaining short links.
///
/// Codes are random and non-sequential. Uniqueness is checked against the store
/// before insert and enforced by its primary key; an insert that still hits a
/// conflict is retried with a fresh code and never reported to the caller.
pub struct LinkService<L: LinkRepository + ?Sized = dyn LinkRepository> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    code_length: usize,
    cache_ttl: Duration,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<dyn CacheService>,
        code_length: usize,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            link_repository,
            cache,
            code_length,
            cache_ttl,
        }
    }

    /// Returns a code that is free in the store at the time of the check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] after [`MAX_ALLOCATION_ATTEMPTS`] taken
    /// codes in a row, and store errors as-is.
    pub async fn allocate_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = generate_code(self.code_length);

            if self.link_repository.get(&code).await?.is_none() {
                return Ok(code);
            }

            tracing::debug!(attempt, "Generated code already taken");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_ALLOCATION_ATTEMPTS }),
        ))
    }

    /// Shortens `target_url`.
    ///
    /// The URL is stored exactly as given. The cache is filled in the
    /// background after the insert commits.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s) URL.
    pub async fn create_short_link(&self, target_url: &str) -> Result<ShortLink, AppError> {
        validate_target_url(target_url)?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.allocate_code().await?;

            match self.link_repository.create(&code, target_url).await {
                Ok(link) => {
                    tracing::info!(code = %link.code, "Short link created");
                    spawn_cache_refill(
                        self.cache.clone(),
                        link.code.clone(),
                        link.target_url.clone(),
                        self.cache_ttl,
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, code = %code, "Code collision on insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to store short link",
            json!({ "reason": "Too many insert conflicts" }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link(&self, code: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .get(code)
            .await?
            .ok_or_else(AppError::link_not_found)
    }

    /// Points an existing code at a new URL.
    ///
    /// The old cache entry is dropped before returning, then the new mapping is
    /// written in the background.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad URL and [`AppError::NotFound`]
    /// for an unknown code.
    pub async fn update_link(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError> {
        validate_target_url(target_url)?;

        let link = self.link_repository.update(code, target_url).await?;
        tracing::info!(code = %code, "Short link updated");

        self.invalidate_cached(code).await;
        spawn_cache_refill(
            self.cache.clone(),
            link.code.clone(),
            link.target_url.clone(),
            self.cache_ttl,
        );

        Ok(link)
    }

    /// Deletes a link and its hits. Unknown codes are not an error.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        self.link_repository.delete(code).await?;
        tracing::info!(code = %code, "Short link deleted");

        self.invalidate_cached(code).await;
        Ok(())
    }

    /// Number of stored links.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Checks that the durable store answers.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    async fn invalidate_cached(&self, code: &str) {
        if let Err(e) = self.cache.invalidate(code).await {
            metrics::counter!("cache_errors_total").increment(1);
            tracing::warn!(code = %code, error = %e, "Cache invalidation failed");
        }
    }
}
