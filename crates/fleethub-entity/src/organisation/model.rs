//! Organisation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant organisation. Every fleet, user, and fuel record belongs
/// to exactly one organisation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organisation {
    /// Unique organisation identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// When the organisation was created.
    pub created_at: DateTime<Utc>,
}
