//! Audit log repository implementation.

use sqlx::PgPool;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

/// Insert an audit log entry using any executor (pool or open transaction).
pub(crate) async fn insert_audit_entry<'e, E>(
    executor: E,
    data: &CreateAuditLogEntry,
) -> Result<AuditLogEntry, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, AuditLogEntry>(
        "INSERT INTO audit_log (organisation_id, user_id, action, entity_type, entity_id, old_values, new_values) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(data.organisation_id)
    .bind(data.user_id)
    .bind(&data.action)
    .bind(&data.entity_type)
    .bind(data.entity_id)
    .bind(&data.old_values)
    .bind(&data.new_values)
    .fetch_one(executor)
    .await
}

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an audit log entry.
    pub async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        insert_audit_entry(&self.pool, data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e)
        })
    }
}
