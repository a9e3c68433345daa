//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use fleethub_core::config::AppConfig;
use fleethub_database::repositories::{
    AssetRepository, AuditLogRepository, FuelAuthorizationRepository, FuelTransactionRepository,
    IntegrationHealthRepository, OperatorSessionRepository, OrganisationRepository,
    SyncHistoryRepository, UserRepository,
};
use fleethub_fuel::FuelAuthorizationService;
use fleethub_integration::{FuelBackendClient, FuelSyncEngine};

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    // ── Repositories ─────────────────────────────────────────
    /// Organisation repository.
    pub organisation_repo: Arc<OrganisationRepository>,
    /// Asset repository.
    pub asset_repo: Arc<AssetRepository>,
    /// Integration health repository.
    pub health_repo: Arc<IntegrationHealthRepository>,
    /// Sync history repository.
    pub history_repo: Arc<SyncHistoryRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Fuel authorization state machine.
    pub fuel_service: Arc<FuelAuthorizationService>,
    /// Reconciliation engine.
    pub sync_engine: Arc<FuelSyncEngine>,
    /// External fuel-backend client; absent when not configured.
    pub backend_client: Option<Arc<FuelBackendClient>>,
}

impl AppState {
    /// Wire up repositories and services over a connection pool.
    pub fn build(
        config: Arc<AppConfig>,
        db_pool: PgPool,
        backend_client: Option<Arc<FuelBackendClient>>,
    ) -> Self {
        let organisation_repo = Arc::new(OrganisationRepository::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let asset_repo = Arc::new(AssetRepository::new(db_pool.clone()));
        let session_repo = Arc::new(OperatorSessionRepository::new(db_pool.clone()));
        let authorization_repo = Arc::new(FuelAuthorizationRepository::new(db_pool.clone()));
        let transaction_repo = Arc::new(FuelTransactionRepository::new(db_pool.clone()));
        let audit_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));
        let health_repo = Arc::new(IntegrationHealthRepository::new(db_pool.clone()));
        let history_repo = Arc::new(SyncHistoryRepository::new(db_pool.clone()));

        let fuel_service = Arc::new(FuelAuthorizationService::new(
            Arc::clone(&authorization_repo),
            Arc::clone(&session_repo),
            Arc::clone(&asset_repo),
            Arc::clone(&user_repo),
            Arc::clone(&audit_repo),
        ));

        let sync_engine = Arc::new(FuelSyncEngine::new(
            backend_client.clone(),
            Arc::clone(&authorization_repo),
            Arc::clone(&transaction_repo),
            Arc::clone(&asset_repo),
            Arc::clone(&user_repo),
            Arc::clone(&health_repo),
            Arc::clone(&history_repo),
        ));

        Self {
            config,
            db_pool,
            organisation_repo,
            asset_repo,
            health_repo,
            history_repo,
            fuel_service,
            sync_engine,
            backend_client,
        }
    }
}
