//! Integration health entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Health classification of one external integration for one
/// organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "integration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    /// Last run succeeded with no per-record errors.
    Healthy,
    /// Last run succeeded but some records errored, or recent runs failed.
    Degraded,
    /// Three or more consecutive runs failed.
    Unhealthy,
    /// The integration is not configured.
    Offline,
    /// No run has completed yet.
    Unknown,
}

impl IntegrationStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

/// Running counters for one external integration, per organisation.
///
/// Mutated only by the sync engine after each run; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IntegrationHealth {
    /// Unique row identifier.
    pub id: Uuid,
    /// The organisation.
    pub organisation_id: Uuid,
    /// Integration type discriminator (e.g. `"fuel_backend"`).
    pub integration_type: String,
    /// Current health classification.
    pub status: IntegrationStatus,
    /// Consecutive failing runs; reset to zero on any success.
    pub consecutive_errors: i32,
    /// Total successful runs.
    pub total_successes: i64,
    /// Total failed runs.
    pub total_errors: i64,
    /// Total records ingested across all runs.
    pub total_records_synced: i64,
    /// Completion time of the most recent successful run.
    pub last_successful_sync: Option<DateTime<Utc>>,
    /// Error message from the most recent failing run.
    pub last_error_message: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Row update time.
    pub updated_at: DateTime<Utc>,
}
