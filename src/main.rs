//! FleetHub Server, the fleet management platform.
//!
//! Main entry point that wires all crates together and starts the
//! server: configuration, logging, database, the fuel-backend client,
//! the HTTP API, and the background scheduler.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use fleethub_api::AppState;
use fleethub_core::config::AppConfig;
use fleethub_core::error::AppError;
use fleethub_database::DatabasePool;
use fleethub_integration::{FuelBackendClient, FuelBackendConfig};
use fleethub_worker::CronScheduler;
use fleethub_worker::jobs::{ExpirySweepJob, FuelSyncJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("FLEETHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FleetHub v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    fleethub_database::migration::run_migrations(db.pool()).await?;

    // ── External fuel-backend client ─────────────────────────────
    let backend_client = match FuelBackendConfig::from_env() {
        Ok(Some(backend_config)) => {
            let client = FuelBackendClient::new(backend_config).map_err(AppError::from)?;
            tracing::info!(base_url = client.base_url(), "Fuel backend client configured");
            Some(Arc::new(client))
        }
        Ok(None) => {
            tracing::info!("Fuel backend integration not configured");
            None
        }
        Err(e) => {
            // A partial configuration is a deployment mistake worth
            // failing loudly over, rather than silently running without
            // reconciliation.
            return Err(AppError::from(e));
        }
    };

    // ── Application state ────────────────────────────────────────
    let state = AppState::build(Arc::clone(&config), db.pool().clone(), backend_client);

    // ── Background scheduler ─────────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let expiry_sweep = Arc::new(ExpirySweepJob::new(Arc::clone(&state.fuel_service)));
        let fuel_sync = Arc::new(FuelSyncJob::new(
            Arc::clone(&state.sync_engine),
            Arc::clone(&state.organisation_repo),
            Arc::clone(&state.health_repo),
        ));
        let scheduler =
            CronScheduler::new(config.worker.clone(), expiry_sweep, fuel_sync).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let router = fleethub_api::build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "FleetHub listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    db.close().await;
    tracing::info!("FleetHub stopped");
    Ok(())
}

/// Resolve when the process receives SIGINT.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
