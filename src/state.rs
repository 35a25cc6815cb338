//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{LinkService, RedirectService, StatsService};
use crate::domain::hit_worker::HitRecorder;
use crate::domain::repositories::{HitRepository, LinkRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::DEFAULT_CODE_LENGTH;

/// Tunables that shape the services built by [`AppState::new`].
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub code_length: usize,
    pub cache_ttl: Duration,
    /// Public base for `url_short`; derived per request when `None`.
    pub base_url: Option<String>,
    /// Exposes `/http_error`.
    pub debug: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            base_url: None,
            debug: false,
        }
    }
}

/// Services and handles shared by all requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub cache: Arc<dyn CacheService>,
    pub hit_recorder: HitRecorder,
    pub base_url: Option<String>,
    pub debug: bool,
}

impl AppState {
    /// Wires services over the given store, cache and hit queue.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        hits: Arc<dyn HitRepository>,
        cache: Arc<dyn CacheService>,
        hit_recorder: HitRecorder,
        options: StateOptions,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            links.clone(),
            cache.clone(),
            options.code_length,
            options.cache_ttl,
        ));
        let redirect_service = Arc::new(RedirectService::new(
            links.clone(),
            cache.clone(),
            hit_recorder.clone(),
            options.cache_ttl,
        ));
        let stats_service = Arc::new(StatsService::new(hits, links));

        Self {
            link_service,
            redirect_service,
            stats_service,
            cache,
            hit_recorder,
            base_url: options.base_url,
            debug: options.debug,
        }
    }
}
