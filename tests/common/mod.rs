#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use short::domain::entities::{Hit, ShortLink};
use short::domain::hit_event::HitEvent;
use short::domain::hit_worker::{hit_channel, run_hit_worker};
use short::domain::repositories::{HitRepository, LinkRepository};
use short::error::AppError;
use short::infrastructure::cache::{CacheService, MemoryCache};
use short::routes::build_router;
use short::state::{AppState, StateOptions};

pub const BASE_URL: &str = "http://short.test";

/// Links and hits kept in memory, shared by [`MemoryLinks`] and [`MemoryHits`]
/// so that deleting a link also drops its hits.
#[derive(Default)]
pub struct MemoryStore {
    links: Mutex<HashMap<String, ShortLink>>,
    hits: Mutex<Vec<Hit>>,
    next_hit_id: AtomicI64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every store call fail as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn insert_link(&self, code: &str, url: &str, created_at: DateTime<Utc>) {
        self.links.lock().await.insert(
            code.to_string(),
            ShortLink::new(code.to_string(), url.to_string(), created_at),
        );
    }

    pub async fn insert_hit(&self, code: &str, at: DateTime<Utc>) {
        let id = self.next_hit_id.fetch_add(1, Ordering::SeqCst);
        self.hits.lock().await.push(Hit {
            id,
            link_code: code.to_string(),
            created_at: at,
        });
    }

    pub async fn link_count(&self) -> usize {
        self.links.lock().await.len()
    }

    pub async fn hit_count(&self, code: &str) -> usize {
        self.hits
            .lock()
            .await
            .iter()
            .filter(|h| h.link_code == code)
            .count()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::store_unavailable("Database unavailable: connection refused"))
        } else {
            Ok(())
        }
    }
}

pub struct MemoryLinks(pub Arc<MemoryStore>);

pub struct MemoryHits(pub Arc<MemoryStore>);

#[async_trait]
impl LinkRepository for MemoryLinks {
    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.0.check_online()?;
        Ok(self.0.links.lock().await.get(code).cloned())
    }

    async fn create(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError> {
        self.0.check_online()?;
        let mut links = self.0.links.lock().await;
        if links.contains_key(code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                serde_json::Value::Null,
            ));
        }

        let link = ShortLink::new(code.to_string(), target_url.to_string(), Utc::now());
        links.insert(code.to_string(), link.clone());
        Ok(link)
    }

    async fn update(&self, code: &str, target_url: &str) -> Result<ShortLink, AppError> {
        self.0.check_online()?;
        let mut links = self.0.links.lock().await;
        let link = links.get_mut(code).ok_or_else(AppError::link_not_found)?;
        link.target_url = target_url.to_string();
        Ok(link.clone())
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        self.0.check_online()?;
        self.0.hits.lock().await.retain(|h| h.link_code != code);
        self.0.links.lock().await.remove(code);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        self.0.check_online()?;
        let mut links = self.0.links.lock().await;
        let expired: Vec<String> = links
            .values()
            .filter(|l| l.created_at < cutoff)
            .map(|l| l.code.clone())
            .collect();

        for code in &expired {
            links.remove(code);
        }
        self.0
            .hits
            .lock()
            .await
            .retain(|h| !expired.contains(&h.link_code));

        Ok(expired.len() as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.0.check_online()?;
        Ok(self.0.links.lock().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.0.check_online()
    }
}

#[async_trait]
impl HitRepository for MemoryHits {
    async fn record(&self, code: &str, at: DateTime<Utc>) -> Result<Hit, AppError> {
        self.0.check_online()?;
        let id = self.0.next_hit_id.fetch_add(1, Ordering::SeqCst);
        let hit = Hit {
            id,
            link_code: code.to_string(),
            created_at: at,
        };
        self.0.hits.lock().await.push(hit.clone());
        Ok(hit)
    }

    async fn count_since(
        &self,
        code: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        self.0.check_online()?;
        let count = self
            .0
            .hits
            .lock()
            .await
            .iter()
            .filter(|h| h.link_code == code && h.created_at > from && h.created_at <= to)
            .count();
        Ok(count as i64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        self.0.check_online()?;
        let mut hits = self.0.hits.lock().await;
        let before = hits.len();
        hits.retain(|h| h.created_at >= cutoff);
        Ok((before - hits.len()) as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.0.check_online()?;
        Ok(self.0.hits.lock().await.len() as i64)
    }
}

fn test_options(debug: bool) -> StateOptions {
    StateOptions {
        base_url: Some(BASE_URL.to_string()),
        debug,
        ..StateOptions::default()
    }
}

/// State over an in-memory store. Queued hits stay in the returned receiver.
pub fn create_test_state(store: Arc<MemoryStore>) -> (AppState, mpsc::Receiver<HitEvent>) {
    create_test_state_with(store, test_options(false))
}

pub fn create_test_state_with(
    store: Arc<MemoryStore>,
    options: StateOptions,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (recorder, rx) = hit_channel(100);
    let cache: Arc<dyn CacheService> = Arc::new(MemoryCache::new(1_000));

    let state = AppState::new(
        Arc::new(MemoryLinks(store.clone())),
        Arc::new(MemoryHits(store)),
        cache,
        recorder,
        options,
    );

    (state, rx)
}

/// A running test server with the hit worker attached.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<dyn CacheService>,
    pub worker: JoinHandle<()>,
}

impl TestApp {
    /// Waits until the background refill has cached `code`.
    pub async fn wait_cached(&self, code: &str) -> bool {
        eventually(|| async move { matches!(self.cache.get_url(code).await, Ok(Some(_))) }).await
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_options(false))
}

pub fn spawn_app_with(options: StateOptions) -> TestApp {
    let store = MemoryStore::new();
    let (state, rx) = create_test_state_with(store.clone(), options);
    let cache = state.cache.clone();
    let worker = tokio::spawn(run_hit_worker(rx, Arc::new(MemoryHits(store.clone())), 4));
    let server = TestServer::new(build_router(state)).unwrap();

    TestApp {
        server,
        store,
        cache,
        worker,
    }
}

pub fn debug_options() -> StateOptions {
    test_options(true)
}

/// Extracts the code from a `url_short` value.
pub fn code_of(url_short: &str) -> String {
    url_short.rsplit('/').next().unwrap().to_string()
}

/// Polls `check` until it holds or a second has passed.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO short_links (code, target_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_aged_link(pool: &PgPool, code: &str, url: &str, age_hours: i32) {
    sqlx::query(
        "INSERT INTO short_links (code, target_url, created_at) VALUES ($1, $2, NOW() - make_interval(hours => $3))",
    )
    .bind(code)
    .bind(url)
    .bind(age_hours)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_aged_hit(pool: &PgPool, code: &str, age_hours: i32) {
    sqlx::query(
        "INSERT INTO hit_events (link_code, created_at) VALUES ($1, NOW() - make_interval(hours => $2))",
    )
    .bind(code)
    .bind(age_hours)
    .execute(pool)
    .await
    .unwrap();
}
