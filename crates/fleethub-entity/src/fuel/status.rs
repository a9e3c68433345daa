//! Fuel authorization status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a fuel authorization.
///
/// Lifecycle: `pending → authorized → completed`, with `cancelled` and
/// `expired` as terminal side-exits from either non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fuel_authorization_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    /// Issued to the operator, not yet verified by a bowser.
    Pending,
    /// Verified by a bowser; dispensing may proceed.
    Authorized,
    /// A fuel transaction was recorded against this authorization.
    Completed,
    /// Cancelled by the requesting operator or an admin.
    Cancelled,
    /// The validity window elapsed before completion.
    Expired,
}

impl AuthorizationStatus {
    /// Check if the authorization is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!AuthorizationStatus::Pending.is_terminal());
        assert!(!AuthorizationStatus::Authorized.is_terminal());
        assert!(AuthorizationStatus::Completed.is_terminal());
        assert!(AuthorizationStatus::Cancelled.is_terminal());
        assert!(AuthorizationStatus::Expired.is_terminal());
    }
}
