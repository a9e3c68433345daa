//! Integration sync history entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per sync run: timing, counts, and outcome. Append-only
/// audit trail; failures are recorded the same as successes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IntegrationSyncHistory {
    /// Unique run identifier.
    pub id: Uuid,
    /// The organisation.
    pub organisation_id: Uuid,
    /// Integration type discriminator (e.g. `"fuel_backend"`).
    pub integration_type: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished (success or failure).
    pub completed_at: Option<DateTime<Utc>>,
    /// Records fetched from the external system.
    pub records_fetched: i32,
    /// Transactions created locally.
    pub records_created: i32,
    /// Records updated in place.
    pub records_updated: i32,
    /// Records skipped as already ingested.
    pub records_skipped: i32,
    /// Per-record errors collected during the run.
    pub error_count: i32,
    /// Transactions flagged with a discrepancy.
    pub discrepancy_count: i32,
    /// Whether the run completed without a run-level failure.
    pub success: bool,
    /// Run-level error message, if the run failed.
    pub error_message: Option<String>,
    /// Per-record error payload, keyed by external transaction id.
    pub error_details: Option<serde_json::Value>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Final counters written when a sync run is closed out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SyncRunCounts {
    /// Records fetched from the external system.
    pub fetched: i32,
    /// Transactions created locally.
    pub created: i32,
    /// Records updated in place.
    pub updated: i32,
    /// Records skipped as already ingested.
    pub skipped: i32,
    /// Per-record errors.
    pub errors: i32,
    /// Transactions flagged with a discrepancy.
    pub discrepancies: i32,
}
