//! Fuel authorization repository implementation.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::audit::CreateAuditLogEntry;
use fleethub_entity::fuel::{CreateFuelAuthorization, CreateFuelTransaction, FuelAuthorization, FuelTransaction};

use crate::repositories::audit::insert_audit_entry;
use crate::repositories::fuel_transaction::insert_fuel_transaction;

/// Everything written when an authorization is completed locally.
#[derive(Debug, Clone)]
pub struct CompleteAuthorizationParams {
    /// The fuel transaction to insert.
    pub transaction: CreateFuelTransaction,
    /// New odometer reading to record on the asset, if supplied.
    pub odometer_km: Option<f64>,
    /// New engine hours to record on the asset, if supplied.
    pub engine_hours: Option<f64>,
    /// Audit entry for the completion.
    pub audit: CreateAuditLogEntry,
}

/// Repository for fuel authorization rows.
#[derive(Debug, Clone)]
pub struct FuelAuthorizationRepository {
    pool: PgPool,
}

impl FuelAuthorizationRepository {
    /// Create a new fuel authorization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an authorization by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FuelAuthorization>> {
        sqlx::query_as::<_, FuelAuthorization>("SELECT * FROM fuel_authorizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find authorization", e)
            })
    }

    /// Find an authorization by code, case-insensitively. Codes are stored
    /// uppercase; the incoming code is uppercased for the comparison.
    pub async fn find_by_code(
        &self,
        organisation_id: Uuid,
        auth_code: &str,
    ) -> AppResult<Option<FuelAuthorization>> {
        sqlx::query_as::<_, FuelAuthorization>(
            "SELECT * FROM fuel_authorizations \
             WHERE organisation_id = $1 AND auth_code = UPPER($2) \
             ORDER BY requested_at DESC LIMIT 1",
        )
        .bind(organisation_id)
        .bind(auth_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find authorization by code", e)
        })
    }

    /// Find a live (pending or authorized) authorization holding the given
    /// code. Used for collision checking during code generation and for
    /// sync-side exact-code matching the caller filters further.
    pub async fn find_live_by_code(
        &self,
        organisation_id: Uuid,
        auth_code: &str,
    ) -> AppResult<Option<FuelAuthorization>> {
        sqlx::query_as::<_, FuelAuthorization>(
            "SELECT * FROM fuel_authorizations \
             WHERE organisation_id = $1 AND auth_code = UPPER($2) \
             AND status IN ('pending', 'authorized')",
        )
        .bind(organisation_id)
        .bind(auth_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find live authorization", e)
        })
    }

    /// Find a pending authorization for an operator session, if any.
    pub async fn find_pending_by_session(
        &self,
        operator_session_id: Uuid,
    ) -> AppResult<Option<FuelAuthorization>> {
        sqlx::query_as::<_, FuelAuthorization>(
            "SELECT * FROM fuel_authorizations \
             WHERE operator_session_id = $1 AND status = 'pending'",
        )
        .bind(operator_session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find pending authorization", e)
        })
    }

    /// Create a new pending authorization.
    pub async fn create(&self, data: &CreateFuelAuthorization) -> AppResult<FuelAuthorization> {
        sqlx::query_as::<_, FuelAuthorization>(
            "INSERT INTO fuel_authorizations \
             (organisation_id, asset_id, operator_session_id, operator_id, auth_code, \
              qr_code_data, max_quantity_litres, max_amount_dollars, expires_at) \
             VALUES ($1, $2, $3, $4, UPPER($5), $6, $7, $8, $9) RETURNING *",
        )
        .bind(data.organisation_id)
        .bind(data.asset_id)
        .bind(data.operator_session_id)
        .bind(data.operator_id)
        .bind(&data.auth_code)
        .bind(&data.qr_code_data)
        .bind(data.max_quantity_litres)
        .bind(data.max_amount_dollars)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create authorization", e)
        })
    }

    /// Transition a pending authorization to `authorized` (bowser
    /// verification). Returns `false` if the row was no longer pending.
    pub async fn mark_authorized(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE fuel_authorizations \
             SET status = 'authorized', authorized_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark authorized", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a live authorization to `expired`. Conditional on a
    /// non-terminal status, so repeated calls are idempotent.
    pub async fn mark_expired(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE fuel_authorizations SET status = 'expired', updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'authorized')",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark expired", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a live authorization to `cancelled`. Returns `false` if a
    /// concurrent transition got there first.
    pub async fn mark_cancelled(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE fuel_authorizations \
             SET status = 'cancelled', cancelled_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'authorized')",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark cancelled", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-expire every live authorization whose window has elapsed.
    ///
    /// The WHERE clause mirrors [`FuelAuthorization::is_expired_at`] so the
    /// sweep and the lazy read-time check cannot drift. Idempotent: a
    /// second run affects zero rows.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE fuel_authorizations SET status = 'expired', updated_at = NOW() \
             WHERE status IN ('pending', 'authorized') AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to expire stale authorizations", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Find the best time-windowed authorization candidate for an external
    /// transaction: same asset, requested within the window around the
    /// transaction time, still live, and not already bound to a fuel
    /// transaction. The most recently requested candidate wins.
    pub async fn find_window_candidate(
        &self,
        organisation_id: Uuid,
        asset_id: Uuid,
        around: DateTime<Utc>,
        window_minutes: i64,
    ) -> AppResult<Option<FuelAuthorization>> {
        let window = Duration::minutes(window_minutes);
        sqlx::query_as::<_, FuelAuthorization>(
            "SELECT * FROM fuel_authorizations \
             WHERE organisation_id = $1 AND asset_id = $2 \
             AND status IN ('pending', 'authorized') \
             AND fuel_transaction_id IS NULL \
             AND requested_at >= $3 AND requested_at <= $4 \
             ORDER BY requested_at DESC LIMIT 1",
        )
        .bind(organisation_id)
        .bind(asset_id)
        .bind(around - window)
        .bind(around + window)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find window candidate", e)
        })
    }

    /// Complete an authorization locally: insert the fuel transaction,
    /// conditionally transition the authorization, record new asset meter
    /// readings, and write the audit entry, all in one database
    /// transaction so partial application cannot occur.
    ///
    /// Returns `None` (after rolling back) when the authorization was no
    /// longer in a completable state, which callers surface as
    /// already-completed.
    pub async fn complete(
        &self,
        id: Uuid,
        params: &CompleteAuthorizationParams,
    ) -> AppResult<Option<(FuelAuthorization, FuelTransaction)>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let transaction = insert_fuel_transaction(&mut *tx, &params.transaction)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert fuel transaction", e)
            })?;

        let authorization = sqlx::query_as::<_, FuelAuthorization>(
            "UPDATE fuel_authorizations \
             SET status = 'completed', completed_at = NOW(), fuel_transaction_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'authorized') RETURNING *",
        )
        .bind(id)
        .bind(transaction.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete authorization", e)
        })?;

        let Some(authorization) = authorization else {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back completion", e)
            })?;
            return Ok(None);
        };

        if params.odometer_km.is_some() || params.engine_hours.is_some() {
            sqlx::query(
                "UPDATE assets SET \
                 current_odometer_km = COALESCE($2, current_odometer_km), \
                 current_engine_hours = COALESCE($3, current_engine_hours), \
                 updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(authorization.asset_id)
            .bind(params.odometer_km)
            .bind(params.engine_hours)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update asset meters", e)
            })?;
        }

        insert_audit_entry(&mut *tx, &params.audit).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert audit entry", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit completion", e)
        })?;

        Ok(Some((authorization, transaction)))
    }
}
