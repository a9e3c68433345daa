//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request a new fuel authorization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestAuthorizationRequest {
    /// The asset to be fuelled.
    pub asset_id: Uuid,
    /// The caller's active operator session on the asset.
    pub operator_session_id: Uuid,
    /// Maximum litres, if capped.
    #[validate(range(min = 0.1, message = "Quantity limit must be positive"))]
    pub max_quantity_litres: Option<f64>,
    /// Maximum dollar amount, if capped.
    #[validate(range(min = 0.01, message = "Amount limit must be positive"))]
    pub max_amount_dollars: Option<f64>,
    /// Validity window in minutes (5-60, default 30).
    pub expiry_minutes: Option<i64>,
}

/// Complete an authorization with a recorded dispense.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteAuthorizationRequest {
    /// Litres dispensed.
    #[validate(range(min = 0.001, message = "Quantity must be positive"))]
    pub quantity_litres: f64,
    /// Cost per litre.
    pub unit_cost: Option<f64>,
    /// Total cost.
    pub total_cost: Option<f64>,
    /// Odometer reading in kilometres.
    pub odometer_km: Option<f64>,
    /// Engine hours.
    pub engine_hours: Option<f64>,
    /// Free-text location.
    pub location: Option<String>,
    /// Fuel vendor.
    pub vendor: Option<String>,
    /// Free-text notes.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Cancel an authorization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelAuthorizationRequest {
    /// Why it is being cancelled.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Manually trigger a sync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerSyncRequest {
    /// Window start; defaults to the scheduled window.
    pub from: Option<DateTime<Utc>>,
    /// Window end; defaults to now.
    pub to: Option<DateTime<Utc>>,
}

/// Verify an authorization code against the external backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    /// The authorization code.
    #[validate(length(min = 1, max = 16, message = "Auth code is required"))]
    pub auth_code: String,
}
