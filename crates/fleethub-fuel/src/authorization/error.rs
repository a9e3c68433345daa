//! Typed errors for the fuel authorization state machine.

use thiserror::Error;

use fleethub_core::error::AppError;

/// Errors surfaced by fuel authorization operations.
///
/// Each variant carries a stable wire code (see [`FuelAuthError::code`])
/// so a bowser UI or operator app can react precisely: "already used"
/// renders differently from "expired".
#[derive(Debug, Error)]
pub enum FuelAuthError {
    /// The requester has no active session on the asset.
    #[error("Operator has no active session on this asset")]
    NoActiveSession,

    /// The requester already holds a live pending authorization.
    #[error("An active fuel authorization already exists for this session")]
    ExistingAuthorization,

    /// The requested expiry is outside the allowed window.
    #[error("Expiry must be between {min} and {max} minutes, got {requested}")]
    InvalidExpiryWindow {
        /// Requested expiry in minutes.
        requested: i64,
        /// Minimum allowed.
        min: i64,
        /// Maximum allowed.
        max: i64,
    },

    /// The dispensed quantity is not a positive number of litres.
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,

    /// The dispensed quantity exceeds the authorized ceiling.
    #[error("Quantity {attempted}L exceeds the authorized limit of {limit}L")]
    ExceedsQuantityLimit {
        /// Litres the caller attempted to record.
        attempted: f64,
        /// The authorized ceiling.
        limit: f64,
    },

    /// The cost exceeds the authorized dollar ceiling.
    #[error("Amount ${attempted} exceeds the authorized limit of ${limit}")]
    ExceedsAmountLimit {
        /// Dollars the caller attempted to record.
        attempted: f64,
        /// The authorized ceiling.
        limit: f64,
    },

    /// The authorization was already completed.
    #[error("Authorization has already been completed")]
    AlreadyCompleted,

    /// The authorization was already cancelled.
    #[error("Authorization has already been cancelled")]
    AlreadyCancelled,

    /// The validity window has elapsed.
    #[error("Authorization has expired")]
    Expired,

    /// No authorization exists for the given code.
    #[error("No authorization found for this code")]
    NotFound,

    /// The operator session bound to the authorization has ended.
    #[error("The operator session for this authorization has ended")]
    SessionEnded,

    /// The caller is neither the requesting operator nor admin-scoped.
    #[error("Only the requesting operator or an admin may do this")]
    Forbidden,

    /// Ten consecutive code draws collided with live authorizations.
    #[error("Could not generate a unique authorization code")]
    CodeSpaceExhausted,

    /// An underlying store error.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl FuelAuthError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::ExistingAuthorization => "EXISTING_AUTHORIZATION",
            Self::InvalidExpiryWindow { .. } => "INVALID_EXPIRY_WINDOW",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::ExceedsQuantityLimit { .. } => "EXCEEDS_QUANTITY_LIMIT",
            Self::ExceedsAmountLimit { .. } => "EXCEEDS_AMOUNT_LIMIT",
            Self::AlreadyCompleted => "ALREADY_COMPLETED",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::Expired => "ALREADY_EXPIRED",
            Self::NotFound => "NOT_FOUND",
            Self::SessionEnded => "SESSION_ENDED",
            Self::Forbidden => "FORBIDDEN",
            Self::CodeSpaceExhausted => "INTERNAL_ERROR",
            Self::Store(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_contract() {
        assert_eq!(FuelAuthError::NoActiveSession.code(), "NO_ACTIVE_SESSION");
        assert_eq!(
            FuelAuthError::ExistingAuthorization.code(),
            "EXISTING_AUTHORIZATION"
        );
        assert_eq!(
            FuelAuthError::ExceedsQuantityLimit {
                attempted: 60.0,
                limit: 50.0
            }
            .code(),
            "EXCEEDS_QUANTITY_LIMIT"
        );
        assert_eq!(FuelAuthError::AlreadyCompleted.code(), "ALREADY_COMPLETED");
        assert_eq!(FuelAuthError::Expired.code(), "ALREADY_EXPIRED");
        assert_eq!(FuelAuthError::SessionEnded.code(), "SESSION_ENDED");
    }

    #[test]
    fn test_internal_variants_hide_detail_behind_generic_code() {
        assert_eq!(FuelAuthError::CodeSpaceExhausted.code(), "INTERNAL_ERROR");
        assert_eq!(
            FuelAuthError::Store(AppError::database("boom")).code(),
            "INTERNAL_ERROR"
        );
    }
}
