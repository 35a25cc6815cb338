//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, background tasks, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::services::RetentionService;
use crate::config::{CacheBackend, Config};
use crate::domain::hit_worker::{hit_channel, run_hit_worker};
use crate::domain::repositories::{HitRepository, LinkRepository};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgHitRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, StateOptions};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How long shutdown waits for queued hits to be written.
const HIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the PostgreSQL pool with the configured limits and a server-side
/// `statement_timeout` on every connection.
///
/// # Errors
///
/// Returns an error if the URL is invalid or no connection can be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.database_url)
        .context("Invalid DATABASE_URL")?
        .options([(
            "statement_timeout",
            config.db_statement_timeout_ms.to_string(),
        )]);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the Fast Cache selected by `CACHE_BACKEND`.
///
/// `auto` prefers Redis and falls back to the in-process cache when Redis is
/// unset or unreachable, so the service always starts. `redis` fails startup
/// instead of falling back.
///
/// # Errors
///
/// Returns an error only for `CACHE_BACKEND=redis` when Redis cannot be reached.
pub async fn build_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    let memory = || -> Arc<dyn CacheService> { Arc::new(MemoryCache::new(config.cache_max_entries)) };

    let cache: Arc<dyn CacheService> = match (config.cache_backend, &config.redis_url) {
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
        (CacheBackend::Memory, _) | (CacheBackend::Auto, None) => {
            tracing::info!("Cache enabled (in-process)");
            memory()
        }
        (CacheBackend::Redis, Some(redis_url)) => {
            let redis = RedisCache::connect(
                redis_url,
                &config.cache_key_prefix,
                config.cache_timeout(),
            )
            .await
            .context("Failed to connect to Redis")?;
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        (CacheBackend::Redis, None) => anyhow::bail!("CACHE_BACKEND=redis requires REDIS_URL"),
        (CacheBackend::Auto, Some(redis_url)) => {
            match RedisCache::connect(redis_url, &config.cache_key_prefix, config.cache_timeout())
                .await
            {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                    memory()
                }
            }
        }
    };

    Ok(cache)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Fast Cache (Redis, in-process or none)
/// - Background hit worker
/// - Retention sweeper (unless debug mode)
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting requests, finishes in-flight
/// ones, stops the sweeper, flushes queued hits (bounded) and closes the pool.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = build_cache(&config).await?;

    let pool_arc = Arc::new(pool.clone());
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool_arc.clone()));
    let hit_repository: Arc<dyn HitRepository> = Arc::new(PgHitRepository::new(pool_arc));

    let (hit_recorder, hit_rx) = hit_channel(config.hit_queue_capacity);
    let hit_worker = tokio::spawn(run_hit_worker(
        hit_rx,
        hit_repository.clone(),
        config.hit_worker_concurrency,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = if config.debug {
        tracing::info!("Debug mode: retention sweeper disabled");
        None
    } else {
        let retention = RetentionService::new(
            link_repository.clone(),
            hit_repository.clone(),
            config.link_retention(),
            config.hit_retention(),
        );
        let interval = config.sweep_interval();
        let mut rx = shutdown_rx.clone();

        Some(tokio::spawn(async move {
            retention
                .run(interval, async move {
                    let _ = rx.wait_for(|stop| *stop).await;
                })
                .await;
        }))
    };

    let state = AppState::new(
        link_repository,
        hit_repository,
        cache,
        hit_recorder,
        StateOptions {
            code_length: config.short_code_length,
            cache_ttl: config.cache_ttl(),
            base_url: config.base_url.clone(),
            debug: config.debug,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, shutting down background tasks");
    let _ = shutdown_tx.send(true);

    if let Some(sweeper) = sweeper
        && let Err(e) = sweeper.await
    {
        tracing::error!(error = %e, "Retention sweeper task failed");
    }

    // The router (and with it every HitRecorder) is gone, so the worker drains and exits.
    match tokio::time::timeout(HIT_DRAIN_TIMEOUT, hit_worker).await {
        Ok(Ok(())) => tracing::info!("Hit queue flushed"),
        Ok(Err(e)) => tracing::error!(error = %e, "Hit worker task failed"),
        Err(_) => tracing::warn!("Timed out waiting for hit queue to flush"),
    }

    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
