//! Operator session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status of an operator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "operator_session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The operator is currently signed on to the asset.
    Active,
    /// The session has ended.
    Ended,
}

/// An operator's working session on a single asset.
///
/// Fuel authorizations can only be requested from an active session,
/// and become unusable once the session ends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OperatorSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The organisation this session belongs to.
    pub organisation_id: Uuid,
    /// The asset the operator is signed on to.
    pub asset_id: Uuid,
    /// The operator.
    pub operator_id: Uuid,
    /// Session status.
    pub status: SessionStatus,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
}

impl OperatorSession {
    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::Active)
    }
}
