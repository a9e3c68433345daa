//! Integration sync history repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::integration::{IntegrationSyncHistory, SyncRunCounts};

/// Repository for the append-only sync run audit trail.
#[derive(Debug, Clone)]
pub struct SyncHistoryRepository {
    pool: PgPool,
}

impl SyncHistoryRepository {
    /// Create a new sync history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a new history row for a run that is starting now.
    pub async fn start_run(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
    ) -> AppResult<IntegrationSyncHistory> {
        sqlx::query_as::<_, IntegrationSyncHistory>(
            "INSERT INTO integration_sync_history (organisation_id, integration_type) \
             VALUES ($1, $2) RETURNING *",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to start sync run", e))
    }

    /// Close out a history row with final counts and outcome. Called on
    /// both success and failure paths.
    pub async fn complete_run(
        &self,
        id: Uuid,
        counts: &SyncRunCounts,
        success: bool,
        error_message: Option<&str>,
        error_details: Option<&serde_json::Value>,
    ) -> AppResult<IntegrationSyncHistory> {
        sqlx::query_as::<_, IntegrationSyncHistory>(
            "UPDATE integration_sync_history SET \
             completed_at = NOW(), \
             records_fetched = $2, records_created = $3, records_updated = $4, \
             records_skipped = $5, error_count = $6, discrepancy_count = $7, \
             success = $8, error_message = $9, error_details = $10 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(counts.fetched)
        .bind(counts.created)
        .bind(counts.updated)
        .bind(counts.skipped)
        .bind(counts.errors)
        .bind(counts.discrepancies)
        .bind(success)
        .bind(error_message)
        .bind(error_details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete sync run", e))
    }

    /// List the most recent runs for an integration, newest first.
    pub async fn list_recent(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
        limit: i64,
    ) -> AppResult<Vec<IntegrationSyncHistory>> {
        sqlx::query_as::<_, IntegrationSyncHistory>(
            "SELECT * FROM integration_sync_history \
             WHERE organisation_id = $1 AND integration_type = $2 \
             ORDER BY started_at DESC LIMIT $3",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sync history", e))
    }
}
