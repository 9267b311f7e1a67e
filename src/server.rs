//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the lifecycle worker, and the Axum
//! server lifecycle including graceful shutdown.

use crate::config::Config;
use crate::domain::lifecycle_worker::run_lifecycle_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Builds the PostgreSQL pool from the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable within the connect timeout.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background lifecycle worker
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, drains
/// in-flight requests, signals the lifecycle worker and waits for it (bounded
/// by the shutdown timeout), then closes the pool.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Migrations applied");

    let repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_lifecycle_worker(
        repository.clone(),
        config.lifecycle_interval(),
        shutdown_rx,
    ));

    let state = AppState::new(repository, config.default_lifetime_days);
    let app = app_router(
        state,
        &config.cors_allowed_origins,
        config.request_timeout(),
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if shutdown_tx.send(true).is_err() {
        warn!("Lifecycle worker already stopped");
    }

    match timeout(config.shutdown_timeout(), worker).await {
        Ok(Ok(())) => info!("Lifecycle worker finished"),
        Ok(Err(e)) => error!(error = %e, "Lifecycle worker panicked"),
        Err(_) => warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Lifecycle worker did not stop in time"
        ),
    }

    pool.close().await;
    info!("Database pool closed");

    served.context("Server error")
}

/// Resolves on Ctrl-C, or on SIGTERM where supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
