//! Fuel authorization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fuel::status::AuthorizationStatus;

/// A short-lived permission for one operator to dispense fuel to one
/// asset, identified by a 6-character code and valid for a bounded
/// window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelAuthorization {
    /// Unique authorization identifier.
    pub id: Uuid,
    /// The organisation this authorization belongs to.
    pub organisation_id: Uuid,
    /// The asset to be fuelled.
    pub asset_id: Uuid,
    /// The operator session the request was made from.
    pub operator_session_id: Uuid,
    /// The requesting operator.
    pub operator_id: Uuid,
    /// Short code identifying the authorization (stored uppercase).
    pub auth_code: String,
    /// Serialized QR payload handed to the operator.
    pub qr_code_data: String,
    /// Lifecycle status.
    pub status: AuthorizationStatus,
    /// Maximum litres the bowser may dispense, if capped.
    pub max_quantity_litres: Option<f64>,
    /// Maximum dollar amount, if capped.
    pub max_amount_dollars: Option<f64>,
    /// When the operator requested the authorization.
    pub requested_at: DateTime<Utc>,
    /// End of the validity window.
    pub expires_at: DateTime<Utc>,
    /// When a bowser verified the code.
    pub authorized_at: Option<DateTime<Utc>>,
    /// When a fuel transaction was recorded.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the authorization was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// The fuel transaction bound at completion time.
    pub fuel_transaction_id: Option<Uuid>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Row update time.
    pub updated_at: DateTime<Utc>,
}

impl FuelAuthorization {
    /// Check whether the validity window has elapsed for a still-live
    /// authorization.
    ///
    /// This predicate is the single source of truth for expiry: the lazy
    /// check on read and the bulk sweep both apply the same cutoff
    /// (`expires_at <= now`, non-terminal status only).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.expires_at <= now
    }
}

/// Data required to create a new fuel authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFuelAuthorization {
    /// The organisation.
    pub organisation_id: Uuid,
    /// The asset to be fuelled.
    pub asset_id: Uuid,
    /// The operator session the request was made from.
    pub operator_session_id: Uuid,
    /// The requesting operator.
    pub operator_id: Uuid,
    /// Generated auth code (uppercase).
    pub auth_code: String,
    /// Serialized QR payload.
    pub qr_code_data: String,
    /// Maximum litres, if capped.
    pub max_quantity_litres: Option<f64>,
    /// Maximum dollar amount, if capped.
    pub max_amount_dollars: Option<f64>,
    /// End of the validity window.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn authorization(status: AuthorizationStatus, expires_at: DateTime<Utc>) -> FuelAuthorization {
        let now = Utc::now();
        FuelAuthorization {
            id: Uuid::new_v4(),
            organisation_id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            operator_session_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            auth_code: "K7M2P9".to_string(),
            qr_code_data: String::new(),
            status,
            max_quantity_litres: None,
            max_amount_dollars: None,
            requested_at: now - Duration::minutes(45),
            expires_at,
            authorized_at: None,
            completed_at: None,
            cancelled_at: None,
            fuel_transaction_id: None,
            created_at: now - Duration::minutes(45),
            updated_at: now - Duration::minutes(45),
        }
    }

    #[test]
    fn test_pending_past_window_is_expired() {
        let now = Utc::now();
        let auth = authorization(AuthorizationStatus::Pending, now - Duration::minutes(1));
        assert!(auth.is_expired_at(now));
    }

    #[test]
    fn test_pending_inside_window_is_not_expired() {
        let now = Utc::now();
        let auth = authorization(AuthorizationStatus::Pending, now + Duration::minutes(10));
        assert!(!auth.is_expired_at(now));
    }

    #[test]
    fn test_terminal_states_never_expire() {
        let now = Utc::now();
        for status in [
            AuthorizationStatus::Completed,
            AuthorizationStatus::Cancelled,
            AuthorizationStatus::Expired,
        ] {
            let auth = authorization(status, now - Duration::hours(2));
            assert!(!auth.is_expired_at(now), "{status} must not re-expire");
        }
    }

    #[test]
    fn test_authorized_past_window_is_expired() {
        let now = Utc::now();
        let auth = authorization(AuthorizationStatus::Authorized, now - Duration::seconds(1));
        assert!(auth.is_expired_at(now));
    }
}
