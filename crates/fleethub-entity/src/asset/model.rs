//! Asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Operational status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    /// In service.
    Active,
    /// Temporarily out of service for maintenance.
    Maintenance,
    /// Permanently retired from the fleet.
    Retired,
}

/// A fleet asset (vehicle, plant, or equipment) that can be fuelled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: Uuid,
    /// The organisation this asset belongs to.
    pub organisation_id: Uuid,
    /// Fleet-internal asset number (e.g. `"TRK-042"`).
    pub asset_number: String,
    /// Registration/license plate, if road-registered.
    pub registration_plate: Option<String>,
    /// Fuel type this asset takes (e.g. `"diesel"`).
    pub fuel_type: Option<String>,
    /// Last recorded odometer reading in kilometres.
    pub current_odometer_km: Option<f64>,
    /// Last recorded engine hours.
    pub current_engine_hours: Option<f64>,
    /// Operational status.
    pub status: AssetStatus,
    /// When the asset was created.
    pub created_at: DateTime<Utc>,
    /// When the asset was last updated.
    pub updated_at: DateTime<Utc>,
}
