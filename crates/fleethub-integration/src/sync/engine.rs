//! The fuel-backend reconciliation engine.
//!
//! Pulls a date-bounded window of external transactions, maps each one
//! to an internal asset and authorization, classifies discrepancies,
//! persists exactly one transaction per external id, and rolls up
//! integration health. Per-record failures never abort a run; run-level
//! failures still close out the history row and downgrade health.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use fleethub_core::result::AppResult;
use fleethub_database::repositories::{
    AssetRepository, FuelAuthorizationRepository, FuelTransactionRepository,
    IntegrationHealthRepository, SyncHistoryRepository, UserRepository,
};
use fleethub_entity::asset::Asset;
use fleethub_entity::audit::CreateAuditLogEntry;
use fleethub_entity::fuel::{
    AuthorizationStatus, CreateFuelTransaction, FuelAuthorization, TransactionSource,
};
use fleethub_entity::integration::{IntegrationHealth, SyncRunCounts};
use fleethub_entity::user::User;

use crate::client::models::ExternalFuelTransaction;
use crate::client::{FuelBackendClient, FuelBackendError};
use crate::sync::discrepancy;

/// Integration type discriminator for health and history rows.
pub const INTEGRATION_TYPE_FUEL_BACKEND: &str = "fuel_backend";

/// Half-width of the fallback authorization match window: a candidate
/// must have been requested within this many minutes of the external
/// transaction time.
pub const AUTH_MATCH_WINDOW_MINUTES: i64 = 60;

/// Page size requested from the backend.
const SYNC_PAGE_LIMIT: u32 = 100;

/// How far before the last successful sync each scheduled window starts,
/// to absorb clock skew and late-arriving backend records.
const WINDOW_OVERLAP_HOURS: i64 = 1;

/// Window used when no successful sync has ever completed.
const INITIAL_WINDOW_HOURS: i64 = 24;

/// One per-record failure, keyed by the external transaction id so an
/// operator can chase it up against the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRecordError {
    /// The external transaction id.
    pub external_id: String,
    /// What went wrong.
    pub message: String,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRunSummary {
    /// The history row recording this run.
    pub history_id: Uuid,
    /// Final counters.
    pub counts: SyncRunCounts,
    /// Per-record failures.
    pub errors: Vec<SyncRecordError>,
    /// Whether the run completed without a run-level failure.
    pub success: bool,
    /// Run-level failure description, if any.
    pub error_message: Option<String>,
}

/// What happened to one external record.
enum RecordOutcome {
    Created { flagged: bool },
    Skipped,
}

/// Reconciles external fuel transactions against local state.
#[derive(Clone)]
pub struct FuelSyncEngine {
    client: Option<Arc<FuelBackendClient>>,
    authorizations: Arc<FuelAuthorizationRepository>,
    transactions: Arc<FuelTransactionRepository>,
    assets: Arc<AssetRepository>,
    users: Arc<UserRepository>,
    health: Arc<IntegrationHealthRepository>,
    history: Arc<SyncHistoryRepository>,
}

impl FuelSyncEngine {
    /// Creates a new sync engine. `client` is `None` when the backend
    /// integration is not configured; runs then fail fast and report
    /// `offline` health without attempting a network call.
    pub fn new(
        client: Option<Arc<FuelBackendClient>>,
        authorizations: Arc<FuelAuthorizationRepository>,
        transactions: Arc<FuelTransactionRepository>,
        assets: Arc<AssetRepository>,
        users: Arc<UserRepository>,
        health: Arc<IntegrationHealthRepository>,
        history: Arc<SyncHistoryRepository>,
    ) -> Self {
        Self {
            client,
            authorizations,
            transactions,
            assets,
            users,
            health,
            history,
        }
    }

    /// Whether a backend client is wired in.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// The window a scheduled run should cover, derived from the health
    /// row: restart a little before the last successful sync, or reach
    /// back a day when none exists.
    pub fn sync_window(
        health: &IntegrationHealth,
        now: DateTime<Utc>,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = match health.last_successful_sync {
            Some(last) => last - Duration::hours(WINDOW_OVERLAP_HOURS),
            None => now - Duration::hours(INITIAL_WINDOW_HOURS),
        };
        (from, now)
    }

    /// Run one reconciliation pass over the given window.
    ///
    /// Always produces a closed-out history row and a health update,
    /// on both success and failure paths, so the caller never receives a
    /// silent no-op.
    pub async fn run(
        &self,
        organisation_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<SyncRunSummary> {
        self.health
            .find_or_create(organisation_id, INTEGRATION_TYPE_FUEL_BACKEND)
            .await?;
        let history = self
            .history
            .start_run(organisation_id, INTEGRATION_TYPE_FUEL_BACKEND)
            .await?;

        info!(
            %organisation_id,
            history_id = %history.id,
            from = %from,
            to = %to,
            "Starting fuel backend sync run"
        );

        let mut counts = SyncRunCounts::default();
        let mut errors: Vec<SyncRecordError> = Vec::new();
        let run_result = self
            .run_inner(organisation_id, from, to, &mut counts, &mut errors)
            .await;

        let now = Utc::now();
        let (success, error_message) = match &run_result {
            Ok(()) => {
                self.health
                    .record_run_success(
                        organisation_id,
                        INTEGRATION_TYPE_FUEL_BACKEND,
                        i64::from(counts.created),
                        !errors.is_empty(),
                        now,
                    )
                    .await?;
                (true, None)
            }
            Err(run_error) => {
                let offline = matches!(run_error, FuelBackendError::NotConfigured { .. });
                self.health
                    .record_run_failure(
                        organisation_id,
                        INTEGRATION_TYPE_FUEL_BACKEND,
                        &run_error.to_string(),
                        offline,
                    )
                    .await?;
                error!(
                    %organisation_id,
                    error = %run_error,
                    "Fuel backend sync run failed"
                );
                (false, Some(run_error.to_string()))
            }
        };

        // Best-effort close-out: a history write failure must not mask
        // the run's actual outcome.
        let error_details = (!errors.is_empty())
            .then(|| serde_json::to_value(&errors).ok())
            .flatten();
        if let Err(history_error) = self
            .history
            .complete_run(
                history.id,
                &counts,
                success,
                error_message.as_deref(),
                error_details.as_ref(),
            )
            .await
        {
            warn!(
                history_id = %history.id,
                error = %history_error,
                "Failed to close out sync history row"
            );
        }

        info!(
            %organisation_id,
            history_id = %history.id,
            fetched = counts.fetched,
            created = counts.created,
            skipped = counts.skipped,
            errors = counts.errors,
            discrepancies = counts.discrepancies,
            success,
            "Fuel backend sync run finished"
        );

        Ok(SyncRunSummary {
            history_id: history.id,
            counts,
            errors,
            success,
            error_message,
        })
    }

    /// Page loop and per-record pipeline. Accumulates into the caller's
    /// counters so a run-level failure still reports the work done before
    /// the abort.
    async fn run_inner(
        &self,
        organisation_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        counts: &mut SyncRunCounts,
        errors: &mut Vec<SyncRecordError>,
    ) -> Result<(), FuelBackendError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FuelBackendError::NotConfigured {
                reason: "no fuel backend client is configured".to_string(),
            })?;

        let default_operator = self
            .users
            .find_default_operator(organisation_id)
            .await
            .map_err(|e| FuelBackendError::Unknown {
                message: e.to_string(),
            })?;

        let mut cursor: Option<String> = None;
        loop {
            let page = client
                .fetch_transactions(from, to, cursor.as_deref(), SYNC_PAGE_LIMIT)
                .await?;
            counts.fetched += page.transactions.len() as i32;

            for record in &page.transactions {
                match self
                    .process_record(organisation_id, default_operator.as_ref(), record)
                    .await
                {
                    Ok(RecordOutcome::Created { flagged }) => {
                        counts.created += 1;
                        if flagged {
                            counts.discrepancies += 1;
                        }
                    }
                    Ok(RecordOutcome::Skipped) => counts.skipped += 1,
                    Err(message) => {
                        warn!(
                            external_id = %record.id,
                            %message,
                            "Failed to reconcile external transaction"
                        );
                        counts.errors += 1;
                        errors.push(SyncRecordError {
                            external_id: record.id.clone(),
                            message,
                        });
                    }
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(())
    }

    /// Reconcile one external transaction. Errors are per-record: they
    /// surface in the run's error list and never abort the run.
    async fn process_record(
        &self,
        organisation_id: Uuid,
        default_operator: Option<&User>,
        record: &ExternalFuelTransaction,
    ) -> Result<RecordOutcome, String> {
        if self
            .transactions
            .exists_by_external_id(organisation_id, &record.id)
            .await
            .map_err(|e| e.to_string())?
        {
            debug!(external_id = %record.id, "External transaction already ingested");
            return Ok(RecordOutcome::Skipped);
        }

        let asset = self.match_asset(organisation_id, record).await?;
        let authorization = self
            .match_authorization(organisation_id, &asset, record)
            .await
            .map_err(|e| e.to_string())?;

        let operator_id = match &authorization {
            Some(auth) => auth.operator_id,
            None => {
                default_operator
                    .ok_or_else(|| {
                        "no authorization matched and the organisation has no active user \
                         to attach as operator"
                            .to_string()
                    })?
                    .id
            }
        };

        let verdict = discrepancy::classify(
            authorization.as_ref(),
            asset.id,
            record.quantity_litres,
            record.total_cost,
        );

        let audit = authorization.as_ref().map(|auth| CreateAuditLogEntry {
            organisation_id,
            user_id: auth.operator_id,
            action: "fuel_authorization.complete".to_string(),
            entity_type: "fuel_authorization".to_string(),
            entity_id: Some(auth.id),
            old_values: Some(serde_json::json!({ "status": auth.status })),
            new_values: Some(serde_json::json!({
                "status": AuthorizationStatus::Completed,
                "source": TransactionSource::ExternalSync,
                "external_transaction_id": record.id,
            })),
        });

        let data = CreateFuelTransaction {
            organisation_id,
            asset_id: asset.id,
            operator_id,
            authorization_id: authorization.as_ref().map(|a| a.id),
            quantity_litres: record.quantity_litres,
            unit_cost: record.unit_cost,
            total_cost: record.total_cost,
            fuel_type: record.fuel_type.clone(),
            odometer_km: record.odometer,
            engine_hours: None,
            location: record.site_name.clone(),
            vendor: record.vendor.clone(),
            notes: None,
            transaction_date: record.transaction_date,
            source: TransactionSource::ExternalSync,
            external_transaction_id: Some(record.id.clone()),
            has_discrepancy: verdict.is_some(),
            discrepancy_type: verdict.as_ref().map(|v| v.discrepancy_type()),
            discrepancy_details: verdict,
        };

        let (transaction, authorization_completed) = self
            .transactions
            .record_external(&data, audit.as_ref())
            .await
            .map_err(|e| e.to_string())?;

        if let Some(auth) = &authorization {
            if authorization_completed {
                debug!(
                    authorization_id = %auth.id,
                    transaction_id = %transaction.id,
                    "Completed authorization from external sync"
                );
            } else {
                // A local complete won the race; its transaction already
                // owns the authorization. Benign; the external record is
                // still kept.
                debug!(
                    authorization_id = %auth.id,
                    "Authorization was already completed by another writer"
                );
            }
        }

        Ok(RecordOutcome::Created {
            flagged: data.has_discrepancy,
        })
    }

    /// Resolve the external record to an asset: exact plate match first,
    /// then the backend's vehicle identifier against our asset number.
    async fn match_asset(
        &self,
        organisation_id: Uuid,
        record: &ExternalFuelTransaction,
    ) -> Result<Asset, String> {
        if let Some(plate) = &record.vehicle_registration {
            if let Some(asset) = self
                .assets
                .find_by_registration_plate(organisation_id, plate)
                .await
                .map_err(|e| e.to_string())?
            {
                return Ok(asset);
            }
        }
        if let Some(vehicle_id) = &record.vehicle_id {
            if let Some(asset) = self
                .assets
                .find_by_asset_number(organisation_id, vehicle_id)
                .await
                .map_err(|e| e.to_string())?
            {
                return Ok(asset);
            }
        }
        Err(format!(
            "no asset matches registration {:?} or vehicle id {:?}",
            record.vehicle_registration, record.vehicle_id
        ))
    }

    /// Match the record to an authorization: an exact case-insensitive
    /// code match (authorized or completed) wins; otherwise fall back to
    /// the most recently requested live authorization for the same asset
    /// inside the ±60-minute window that is not already bound to a
    /// transaction.
    async fn match_authorization(
        &self,
        organisation_id: Uuid,
        asset: &Asset,
        record: &ExternalFuelTransaction,
    ) -> AppResult<Option<FuelAuthorization>> {
        if let Some(code) = &record.authorization_code {
            if let Some(auth) = self.authorizations.find_by_code(organisation_id, code).await? {
                if matches!(
                    auth.status,
                    AuthorizationStatus::Authorized | AuthorizationStatus::Completed
                ) {
                    return Ok(Some(auth));
                }
            }
        }

        self.authorizations
            .find_window_candidate(
                organisation_id,
                asset.id,
                record.transaction_date,
                AUTH_MATCH_WINDOW_MINUTES,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleethub_entity::integration::IntegrationStatus;

    fn health(last_successful_sync: Option<DateTime<Utc>>) -> IntegrationHealth {
        let now = Utc::now();
        IntegrationHealth {
            id: Uuid::new_v4(),
            organisation_id: Uuid::new_v4(),
            integration_type: INTEGRATION_TYPE_FUEL_BACKEND.to_string(),
            status: IntegrationStatus::Unknown,
            consecutive_errors: 0,
            total_successes: 0,
            total_errors: 0,
            total_records_synced: 0,
            last_successful_sync,
            last_error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_window_overlaps_last_successful_sync() {
        let now = Utc::now();
        let last = now - Duration::hours(2);
        let (from, to) = FuelSyncEngine::sync_window(&health(Some(last)), now);
        assert_eq!(from, last - Duration::hours(1));
        assert_eq!(to, now);
    }

    #[test]
    fn test_window_defaults_to_last_day() {
        let now = Utc::now();
        let (from, to) = FuelSyncEngine::sync_window(&health(None), now);
        assert_eq!(from, now - Duration::hours(24));
        assert_eq!(to, now);
    }
}
