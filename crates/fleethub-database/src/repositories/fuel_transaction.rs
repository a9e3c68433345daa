//! Fuel transaction repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::audit::CreateAuditLogEntry;
use fleethub_entity::fuel::{CreateFuelTransaction, FuelTransaction};

use crate::repositories::audit::insert_audit_entry;

/// Insert a fuel transaction using any executor (pool or open transaction).
pub(crate) async fn insert_fuel_transaction<'e, E>(
    executor: E,
    data: &CreateFuelTransaction,
) -> Result<FuelTransaction, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, FuelTransaction>(
        "INSERT INTO fuel_transactions \
         (organisation_id, asset_id, operator_id, authorization_id, quantity_litres, unit_cost, \
          total_cost, fuel_type, odometer_km, engine_hours, location, vendor, notes, \
          transaction_date, source, external_transaction_id, has_discrepancy, discrepancy_type, \
          discrepancy_details) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
         RETURNING *",
    )
    .bind(data.organisation_id)
    .bind(data.asset_id)
    .bind(data.operator_id)
    .bind(data.authorization_id)
    .bind(data.quantity_litres)
    .bind(data.unit_cost)
    .bind(data.total_cost)
    .bind(&data.fuel_type)
    .bind(data.odometer_km)
    .bind(data.engine_hours)
    .bind(&data.location)
    .bind(&data.vendor)
    .bind(&data.notes)
    .bind(data.transaction_date)
    .bind(data.source)
    .bind(&data.external_transaction_id)
    .bind(data.has_discrepancy)
    .bind(data.discrepancy_type)
    .bind(data.discrepancy_details.as_ref().map(Json))
    .fetch_one(executor)
    .await
}

/// Repository for fuel transaction rows.
#[derive(Debug, Clone)]
pub struct FuelTransactionRepository {
    pool: PgPool,
}

impl FuelTransactionRepository {
    /// Create a new fuel transaction repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a transaction by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FuelTransaction>> {
        sqlx::query_as::<_, FuelTransaction>("SELECT * FROM fuel_transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find fuel transaction", e)
            })
    }

    /// Check whether an external transaction id has already been ingested
    /// for this organisation. This is the sync dedup key.
    pub async fn exists_by_external_id(
        &self,
        organisation_id: Uuid,
        external_transaction_id: &str,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fuel_transactions \
             WHERE organisation_id = $1 AND external_transaction_id = $2",
        )
        .bind(organisation_id)
        .bind(external_transaction_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to check external transaction id",
                e,
            )
        })?;
        Ok(count > 0)
    }

    /// Persist one externally-synced transaction, atomically binding it to
    /// its matched authorization where one exists.
    ///
    /// The whole effect runs in a single database transaction: the fuel
    /// transaction row, the conditional authorization completion, and the
    /// audit entry land together or not at all. The authorization update is
    /// filtered to non-terminal statuses; a concurrent local `complete` that
    /// got there first leaves it at zero rows, which is reported back as
    /// `authorization_completed = false` and is not an error.
    pub async fn record_external(
        &self,
        data: &CreateFuelTransaction,
        audit: Option<&CreateAuditLogEntry>,
    ) -> AppResult<(FuelTransaction, bool)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let transaction = insert_fuel_transaction(&mut *tx, data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert fuel transaction", e)
        })?;

        let mut authorization_completed = false;
        if let Some(authorization_id) = data.authorization_id {
            let result = sqlx::query(
                "UPDATE fuel_authorizations \
                 SET status = 'completed', completed_at = NOW(), fuel_transaction_id = $2, updated_at = NOW() \
                 WHERE id = $1 AND status IN ('pending', 'authorized')",
            )
            .bind(authorization_id)
            .bind(transaction.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to complete authorization", e)
            })?;
            authorization_completed = result.rows_affected() > 0;
        }

        if let Some(audit) = audit {
            insert_audit_entry(&mut *tx, audit).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert audit entry", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok((transaction, authorization_completed))
    }
}
