//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backend, connects the cache, spawns the visit worker
//! and runs the Axum server until Ctrl+C or SIGTERM.

use crate::api::middleware::rate_limit::RateLimit;
use crate::application::services::hash_token;
use crate::config::{Config, StaticToken, StorageBackend};
use crate::domain::repositories::{TokenRepository, UrlRepository};
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    MemoryTokenRepository, MemoryUrlRepository, PgTokenRepository, PgUrlRepository,
};
use crate::routes::{RouterOptions, app_router};
use crate::state::{AppState, StateParts};
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the storage backend (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the visit queue is closed and the worker drains what is
/// already queued before this function returns.
///
/// # Errors
///
/// Returns an error if the database connection or migrations fail, API
/// tokens cannot be seeded, or the listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let (repository, tokens) = storage(&config).await?;
    let cache = connect_cache(&config).await;

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        repository.clone(),
        config.visit_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.visit_worker_concurrency,
        "Visit worker started"
    );

    let state = AppState::new(StateParts {
        repository,
        tokens,
        cache,
        visit_sender: visit_tx,
        generator: CodeGenerator::new(config.code_length, config.code_max_attempts),
        base_url: config.base_url.clone(),
        token_signing_secret: config.token_signing_secret.clone(),
    });

    let app = app_router(
        state,
        RouterOptions {
            rate_limit: Some(RateLimit::per_second(
                config.rate_limit_per_second,
                config.rate_limit_burst,
            )),
            behind_proxy: config.behind_proxy,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last visit sender) is gone; wait for the
    // worker to flush queued visits.
    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "Visit worker ended abnormally");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn storage(config: &Config) -> Result<(Arc<dyn UrlRepository>, Arc<dyn TokenRepository>)> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            tracing::info!("Storage backend: PostgreSQL");

            let repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(pool.clone()));
            let tokens: Arc<dyn TokenRepository> = Arc::new(PgTokenRepository::new(pool));

            if !config.api_tokens.is_empty() {
                tracing::warn!("API_TOKENS is ignored by the postgres backend; use the admin CLI");
            }

            Ok((repository, tokens))
        }
        StorageBackend::Memory => {
            tracing::info!("Storage backend: in-memory (data is lost on restart)");

            let tokens = MemoryTokenRepository::new();
            seed_tokens(&tokens, &config.api_tokens, &config.token_signing_secret).await?;

            Ok((Arc::new(MemoryUrlRepository::new()), Arc::new(tokens)))
        }
    }
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Registers the `API_TOKENS` entries, hashed like the admin CLI does.
pub async fn seed_tokens(
    repository: &dyn TokenRepository,
    tokens: &[StaticToken],
    signing_secret: &str,
) -> Result<()> {
    for entry in tokens {
        let token_hash = hash_token(signing_secret, &entry.token)?;
        repository
            .create_token(&entry.owner_id, &entry.owner_id, &token_hash)
            .await
            .with_context(|| format!("Failed to register API token for '{}'", entry.owner_id))?;
    }

    tracing::info!(count = tokens.len(), "Static API tokens registered");
    Ok(())
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {e}. Using NullCache.");
            Arc::new(NullCache::new())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
