//! Discrepancy detection for reconciled fuel transactions.
//!
//! Unlike the hard ceilings enforced on the local complete path, the
//! reconciliation thresholds tolerate small metering variance: the fuel
//! has already been dispensed, so only meaningful overshoot is flagged
//! for operator follow-up.

use uuid::Uuid;

use fleethub_entity::fuel::{DiscrepancyDetails, FuelAuthorization};

/// Dispensed litres may exceed the authorized ceiling by up to this
/// percentage before being flagged.
pub const QUANTITY_TOLERANCE_PERCENT: f64 = 5.0;

/// Cost may exceed the authorized dollar ceiling by up to this
/// percentage before being flagged.
pub const AMOUNT_TOLERANCE_PERCENT: f64 = 10.0;

/// Classify an external transaction against its matched authorization.
///
/// Returns `None` when nothing is out of order. A transaction with no
/// authorization at all is `unauthorized`; several simultaneous issues
/// collapse to `multiple`, retaining the individual findings.
pub fn classify(
    authorization: Option<&FuelAuthorization>,
    resolved_asset_id: Uuid,
    quantity_litres: f64,
    total_cost: Option<f64>,
) -> Option<DiscrepancyDetails> {
    let Some(authorization) = authorization else {
        return Some(DiscrepancyDetails::Unauthorized);
    };

    let mut issues = Vec::new();

    if authorization.asset_id != resolved_asset_id {
        issues.push(DiscrepancyDetails::AssetMismatch {
            authorized_asset_id: authorization.asset_id,
            actual_asset_id: resolved_asset_id,
        });
    }

    if let Some(limit) = authorization.max_quantity_litres {
        if exceeds_with_tolerance(quantity_litres, limit, QUANTITY_TOLERANCE_PERCENT) {
            issues.push(DiscrepancyDetails::QuantityMismatch {
                authorized_litres: limit,
                actual_litres: quantity_litres,
                variance_percent: variance_percent(quantity_litres, limit),
            });
        }
    }

    if let (Some(cost), Some(limit)) = (total_cost, authorization.max_amount_dollars) {
        if exceeds_with_tolerance(cost, limit, AMOUNT_TOLERANCE_PERCENT) {
            issues.push(DiscrepancyDetails::AmountMismatch {
                authorized_dollars: limit,
                actual_dollars: cost,
                variance_percent: variance_percent(cost, limit),
            });
        }
    }

    match issues.len() {
        0 => None,
        1 => issues.pop(),
        _ => Some(DiscrepancyDetails::Multiple { issues }),
    }
}

fn exceeds_with_tolerance(actual: f64, limit: f64, tolerance_percent: f64) -> bool {
    limit > 0.0 && actual > limit * (1.0 + tolerance_percent / 100.0)
}

/// Overshoot as a percentage of the limit.
fn variance_percent(actual: f64, limit: f64) -> f64 {
    (actual - limit) / limit * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fleethub_entity::fuel::{AuthorizationStatus, DiscrepancyType};

    fn authorization(
        asset_id: Uuid,
        max_quantity_litres: Option<f64>,
        max_amount_dollars: Option<f64>,
    ) -> FuelAuthorization {
        let now = Utc::now();
        FuelAuthorization {
            id: Uuid::new_v4(),
            organisation_id: Uuid::new_v4(),
            asset_id,
            operator_session_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            auth_code: "N3T8RW".to_string(),
            qr_code_data: String::new(),
            status: AuthorizationStatus::Authorized,
            max_quantity_litres,
            max_amount_dollars,
            requested_at: now - Duration::minutes(10),
            expires_at: now + Duration::minutes(20),
            authorized_at: Some(now),
            completed_at: None,
            cancelled_at: None,
            fuel_transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_authorization_is_unauthorized() {
        let verdict = classify(None, Uuid::new_v4(), 30.0, None);
        assert_eq!(verdict, Some(DiscrepancyDetails::Unauthorized));
    }

    #[test]
    fn test_clean_transaction_has_no_discrepancy() {
        let asset_id = Uuid::new_v4();
        let auth = authorization(asset_id, Some(40.0), Some(120.0));
        assert!(classify(Some(&auth), asset_id, 35.0, Some(100.0)).is_none());
    }

    #[test]
    fn test_quantity_overshoot_past_tolerance_is_flagged() {
        let asset_id = Uuid::new_v4();
        let auth = authorization(asset_id, Some(50.0), None);
        let verdict = classify(Some(&auth), asset_id, 60.0, None).expect("flagged");
        match verdict {
            DiscrepancyDetails::QuantityMismatch {
                authorized_litres,
                actual_litres,
                variance_percent,
            } => {
                assert_eq!(authorized_litres, 50.0);
                assert_eq!(actual_litres, 60.0);
                assert!((variance_percent - 20.0).abs() < 1e-9);
            }
            other => panic!("expected QuantityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_quantity_within_tolerance_is_not_flagged() {
        let asset_id = Uuid::new_v4();
        let auth = authorization(asset_id, Some(50.0), None);
        // 4% over the ceiling, inside the 5% tolerance.
        assert!(classify(Some(&auth), asset_id, 52.0, None).is_none());
    }

    #[test]
    fn test_amount_overshoot_past_tolerance_is_flagged() {
        let asset_id = Uuid::new_v4();
        let auth = authorization(asset_id, None, Some(100.0));
        let verdict = classify(Some(&auth), asset_id, 30.0, Some(115.0)).expect("flagged");
        assert_eq!(
            verdict.discrepancy_type(),
            DiscrepancyType::AmountMismatch
        );
    }

    #[test]
    fn test_amount_within_tolerance_is_not_flagged() {
        let asset_id = Uuid::new_v4();
        let auth = authorization(asset_id, None, Some(100.0));
        assert!(classify(Some(&auth), asset_id, 30.0, Some(109.0)).is_none());
    }

    #[test]
    fn test_asset_mismatch_is_flagged() {
        let auth = authorization(Uuid::new_v4(), None, None);
        let actual_asset = Uuid::new_v4();
        let verdict = classify(Some(&auth), actual_asset, 30.0, None).expect("flagged");
        assert_eq!(verdict.discrepancy_type(), DiscrepancyType::AssetMismatch);
    }

    #[test]
    fn test_multiple_issues_collapse_to_multiple() {
        let auth = authorization(Uuid::new_v4(), Some(50.0), Some(100.0));
        let verdict = classify(Some(&auth), Uuid::new_v4(), 60.0, Some(150.0)).expect("flagged");
        match verdict {
            DiscrepancyDetails::Multiple { issues } => {
                assert_eq!(issues.len(), 3);
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }
}
