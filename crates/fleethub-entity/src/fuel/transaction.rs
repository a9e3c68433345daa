//! Fuel transaction entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::fuel::discrepancy::{DiscrepancyDetails, DiscrepancyType};

/// How a fuel transaction entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fuel_transaction_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    /// Recorded synchronously by a local `complete` call.
    Synced,
    /// Ingested asynchronously from the external fuel backend.
    ExternalSync,
}

/// A record of fuel actually dispensed.
///
/// Unauthorized dispenses are still recorded, so `authorization_id` is
/// nullable; a transaction never has more than one authorization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelTransaction {
    /// Unique transaction identifier.
    pub id: Uuid,
    /// The organisation this transaction belongs to.
    pub organisation_id: Uuid,
    /// The asset that was fuelled.
    pub asset_id: Uuid,
    /// The operator recorded against the dispense.
    pub operator_id: Uuid,
    /// The authorization this dispense was made under, if any.
    pub authorization_id: Option<Uuid>,
    /// Litres dispensed.
    pub quantity_litres: f64,
    /// Cost per litre.
    pub unit_cost: Option<f64>,
    /// Total cost.
    pub total_cost: Option<f64>,
    /// Fuel type dispensed.
    pub fuel_type: Option<String>,
    /// Odometer reading at fuelling time, in kilometres.
    pub odometer_km: Option<f64>,
    /// Engine hours at fuelling time.
    pub engine_hours: Option<f64>,
    /// Free-text location or site name.
    pub location: Option<String>,
    /// Fuel vendor.
    pub vendor: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the fuel was dispensed.
    pub transaction_date: DateTime<Utc>,
    /// How the transaction entered the system.
    pub source: TransactionSource,
    /// The external system's transaction id (dedup key for sync).
    pub external_transaction_id: Option<String>,
    /// Whether reconciliation flagged this transaction.
    pub has_discrepancy: bool,
    /// Discrepancy classification, if flagged.
    pub discrepancy_type: Option<DiscrepancyType>,
    /// Structured discrepancy detail, if flagged.
    pub discrepancy_details: Option<Json<DiscrepancyDetails>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new fuel transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFuelTransaction {
    /// The organisation.
    pub organisation_id: Uuid,
    /// The asset that was fuelled.
    pub asset_id: Uuid,
    /// The operator recorded against the dispense.
    pub operator_id: Uuid,
    /// The authorization, if one was matched.
    pub authorization_id: Option<Uuid>,
    /// Litres dispensed.
    pub quantity_litres: f64,
    /// Cost per litre.
    pub unit_cost: Option<f64>,
    /// Total cost.
    pub total_cost: Option<f64>,
    /// Fuel type dispensed.
    pub fuel_type: Option<String>,
    /// Odometer reading in kilometres.
    pub odometer_km: Option<f64>,
    /// Engine hours.
    pub engine_hours: Option<f64>,
    /// Location or site name.
    pub location: Option<String>,
    /// Fuel vendor.
    pub vendor: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the fuel was dispensed.
    pub transaction_date: DateTime<Utc>,
    /// How the transaction entered the system.
    pub source: TransactionSource,
    /// The external system's transaction id.
    pub external_transaction_id: Option<String>,
    /// Whether reconciliation flagged this transaction.
    pub has_discrepancy: bool,
    /// Discrepancy classification, if flagged.
    pub discrepancy_type: Option<DiscrepancyType>,
    /// Structured discrepancy detail, if flagged.
    pub discrepancy_details: Option<DiscrepancyDetails>,
}
