//! Fuel reconciliation discrepancy types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Classification of a reconciliation discrepancy, as stored on the
/// fuel transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fuel_discrepancy_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyType {
    /// The matched authorization was issued for a different asset.
    AssetMismatch,
    /// Dispensed litres exceeded the authorized ceiling.
    QuantityMismatch,
    /// Cost exceeded the authorized dollar ceiling.
    AmountMismatch,
    /// No authorization could be matched to the dispense.
    Unauthorized,
    /// More than one of the above at once.
    Multiple,
}

impl DiscrepancyType {
    /// Return the type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetMismatch => "asset_mismatch",
            Self::QuantityMismatch => "quantity_mismatch",
            Self::AmountMismatch => "amount_mismatch",
            Self::Unauthorized => "unauthorized",
            Self::Multiple => "multiple",
        }
    }
}

impl fmt::Display for DiscrepancyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured detail for one detected discrepancy.
///
/// One variant per discrepancy type so consumers can match exhaustively
/// instead of digging through a loosely-typed map. Each ceiling variant
/// stores the authorized limit, the actual value, and the overshoot as
/// a percentage of the limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscrepancyDetails {
    /// The matched authorization was issued for a different asset.
    AssetMismatch {
        /// Asset the authorization was issued for.
        authorized_asset_id: Uuid,
        /// Asset the external transaction resolved to.
        actual_asset_id: Uuid,
    },
    /// Dispensed litres exceeded `max_quantity_litres`.
    QuantityMismatch {
        /// Authorized ceiling in litres.
        authorized_litres: f64,
        /// Litres actually dispensed.
        actual_litres: f64,
        /// Overshoot as a percentage of the ceiling.
        variance_percent: f64,
    },
    /// Cost exceeded `max_amount_dollars`.
    AmountMismatch {
        /// Authorized ceiling in dollars.
        authorized_dollars: f64,
        /// Actual cost.
        actual_dollars: f64,
        /// Overshoot as a percentage of the ceiling.
        variance_percent: f64,
    },
    /// No authorization matched the dispense.
    Unauthorized,
    /// Multiple simultaneous issues.
    Multiple {
        /// The individual issues, in detection order.
        issues: Vec<DiscrepancyDetails>,
    },
}

impl DiscrepancyDetails {
    /// The [`DiscrepancyType`] this detail corresponds to.
    pub fn discrepancy_type(&self) -> DiscrepancyType {
        match self {
            Self::AssetMismatch { .. } => DiscrepancyType::AssetMismatch,
            Self::QuantityMismatch { .. } => DiscrepancyType::QuantityMismatch,
            Self::AmountMismatch { .. } => DiscrepancyType::AmountMismatch,
            Self::Unauthorized => DiscrepancyType::Unauthorized,
            Self::Multiple { .. } => DiscrepancyType::Multiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_tag_roundtrip() {
        let details = DiscrepancyDetails::QuantityMismatch {
            authorized_litres: 50.0,
            actual_litres: 60.0,
            variance_percent: 20.0,
        };
        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["type"], "quantity_mismatch");
        assert_eq!(json["authorized_litres"], 50.0);

        let parsed: DiscrepancyDetails = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, details);
    }

    #[test]
    fn test_multiple_nests_issues() {
        let details = DiscrepancyDetails::Multiple {
            issues: vec![
                DiscrepancyDetails::Unauthorized,
                DiscrepancyDetails::AmountMismatch {
                    authorized_dollars: 100.0,
                    actual_dollars: 150.0,
                    variance_percent: 50.0,
                },
            ],
        };
        assert_eq!(details.discrepancy_type(), DiscrepancyType::Multiple);

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["issues"][0]["type"], "unauthorized");
        assert_eq!(json["issues"][1]["type"], "amount_mismatch");
    }
}
