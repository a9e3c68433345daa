//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording a user action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The organisation the action occurred in.
    pub organisation_id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action that was performed (e.g. `"fuel_authorization.request"`).
    pub action: String,
    /// The type of target entity (e.g. `"fuel_authorization"`).
    pub entity_type: String,
    /// The target entity ID (if applicable).
    pub entity_id: Option<Uuid>,
    /// Entity state before the action (JSON).
    pub old_values: Option<serde_json::Value>,
    /// Entity state after the action (JSON).
    pub new_values: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The organisation the action occurred in.
    pub organisation_id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action performed.
    pub action: String,
    /// Target entity type.
    pub entity_type: String,
    /// Target entity ID.
    pub entity_id: Option<Uuid>,
    /// Entity state before the action.
    pub old_values: Option<serde_json::Value>,
    /// Entity state after the action.
    pub new_values: Option<serde_json::Value>,
}
