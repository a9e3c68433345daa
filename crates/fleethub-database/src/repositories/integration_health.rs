//! Integration health repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::integration::{IntegrationHealth, IntegrationStatus};

/// Number of consecutive failing runs after which an integration is
/// classified `unhealthy` rather than `degraded`.
pub const UNHEALTHY_THRESHOLD: i32 = 3;

/// Repository for per-organisation integration health counters.
#[derive(Debug, Clone)]
pub struct IntegrationHealthRepository {
    pool: PgPool,
}

impl IntegrationHealthRepository {
    /// Create a new integration health repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the health row for an integration, if one exists.
    pub async fn find(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
    ) -> AppResult<Option<IntegrationHealth>> {
        sqlx::query_as::<_, IntegrationHealth>(
            "SELECT * FROM integration_health \
             WHERE organisation_id = $1 AND integration_type = $2",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find integration health", e)
        })
    }

    /// Find or create the health row for an integration. New rows start
    /// with status `unknown` and zeroed counters.
    pub async fn find_or_create(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
    ) -> AppResult<IntegrationHealth> {
        sqlx::query_as::<_, IntegrationHealth>(
            "INSERT INTO integration_health (organisation_id, integration_type) \
             VALUES ($1, $2) \
             ON CONFLICT (organisation_id, integration_type) \
             DO UPDATE SET updated_at = NOW() \
             RETURNING *",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert integration health", e)
        })
    }

    /// Record a successful sync run: reset `consecutive_errors`, bump the
    /// success and record totals, and set status `healthy` or `degraded`
    /// depending on whether the run collected per-record errors.
    pub async fn record_run_success(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
        records_synced: i64,
        had_record_errors: bool,
        completed_at: DateTime<Utc>,
    ) -> AppResult<IntegrationHealth> {
        let status = if had_record_errors {
            IntegrationStatus::Degraded
        } else {
            IntegrationStatus::Healthy
        };

        sqlx::query_as::<_, IntegrationHealth>(
            "UPDATE integration_health SET \
             status = $3, \
             consecutive_errors = 0, \
             total_successes = total_successes + 1, \
             total_records_synced = total_records_synced + $4, \
             last_successful_sync = $5, \
             last_error_message = NULL, \
             updated_at = NOW() \
             WHERE organisation_id = $1 AND integration_type = $2 RETURNING *",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .bind(status)
        .bind(records_synced)
        .bind(completed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record sync success", e)
        })
    }

    /// Record a run-level failure: increment the error counters and
    /// downgrade the status. The record counters are left untouched: a
    /// failed run fabricates no partial data.
    ///
    /// `offline` forces status `offline` (integration not configured);
    /// otherwise the status is `unhealthy` once the consecutive-failure
    /// count reaches [`UNHEALTHY_THRESHOLD`], `degraded` below that.
    pub async fn record_run_failure(
        &self,
        organisation_id: Uuid,
        integration_type: &str,
        error_message: &str,
        offline: bool,
    ) -> AppResult<IntegrationHealth> {
        sqlx::query_as::<_, IntegrationHealth>(
            "UPDATE integration_health SET \
             consecutive_errors = consecutive_errors + 1, \
             total_errors = total_errors + 1, \
             last_error_message = $3, \
             status = CASE \
                 WHEN $4 THEN 'offline'::integration_status \
                 WHEN consecutive_errors + 1 >= $5 THEN 'unhealthy'::integration_status \
                 ELSE 'degraded'::integration_status \
             END, \
             updated_at = NOW() \
             WHERE organisation_id = $1 AND integration_type = $2 RETURNING *",
        )
        .bind(organisation_id)
        .bind(integration_type)
        .bind(error_message)
        .bind(offline)
        .bind(UNHEALTHY_THRESHOLD)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record sync failure", e)
        })
    }
}
