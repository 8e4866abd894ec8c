//! HTTP server initialization and runtime setup.
//!
//! Connects PostgreSQL and Redis, wires the guardian and the shortener, spawns the refresh
//! worker and runs Axum until a shutdown signal arrives.

use crate::application::services::{GuardianService, ShortenerService};
use crate::config::Config;
use crate::domain::refresh_worker::run_refresh_worker;
use crate::domain::repositories::{UrlGuardian, UrlRepository};
use crate::infrastructure::cache::RedisBlocklistStore;
use crate::infrastructure::feed::UrlhausFeed;
use crate::infrastructure::persistence::PgUrlRepository;
use crate::infrastructure::sequence::RedisIdSequence;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Builds the guardian on the shared Redis connection and the configured feed.
pub fn build_guardian(
    config: &Config,
    redis: redis::aio::ConnectionManager,
) -> Result<Arc<GuardianService>> {
    let feed = UrlhausFeed::new(&config.threat_feed_url, config.threat_feed_timeout())
        .context("Failed to build threat feed client")?;

    Ok(Arc::new(GuardianService::new(
        Arc::new(RedisBlocklistStore::new(redis)),
        Arc::new(feed),
        config.guardian_config(),
    )))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis connection shared by the id sequence and the blocklist store
/// - Guardian refresh worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if a backing store is unreachable, migrations fail, or the server
/// cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let redis = crate::infrastructure::redis::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;

    let guardian: Arc<dyn UrlGuardian> = build_guardian(&config, redis.clone())?;
    let url_repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let shortener = Arc::new(ShortenerService::new(
        config.hostname.clone(),
        guardian.clone(),
        Arc::new(RedisIdSequence::new(redis)),
        url_repository.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_refresh_worker(
        guardian.clone(),
        config.guardian_refresh_every(),
        shutdown_rx,
    ));

    let state = AppState::new(shortener, guardian, url_repository);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Refresh worker terminated abnormally");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
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
