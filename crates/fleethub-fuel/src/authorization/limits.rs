//! Pre-authorized ceiling enforcement for the local complete path.

use fleethub_entity::fuel::FuelAuthorization;

use crate::authorization::FuelAuthError;

/// Enforce the authorization's quantity and amount ceilings against an
/// attempted completion.
///
/// Returns the effective total cost: the explicit total if given,
/// otherwise `unit_cost * quantity` when a unit cost is known. The
/// ceilings are hard limits; any overshoot fails, unlike the
/// reconciliation path, which tolerates small metering variance on
/// transactions that already happened.
pub fn enforce_limits(
    authorization: &FuelAuthorization,
    quantity_litres: f64,
    unit_cost: Option<f64>,
    total_cost: Option<f64>,
) -> Result<Option<f64>, FuelAuthError> {
    if let Some(limit) = authorization.max_quantity_litres {
        if quantity_litres > limit {
            return Err(FuelAuthError::ExceedsQuantityLimit {
                attempted: quantity_litres,
                limit,
            });
        }
    }

    let effective_total = total_cost.or_else(|| unit_cost.map(|unit| unit * quantity_litres));

    if let (Some(total), Some(limit)) = (effective_total, authorization.max_amount_dollars) {
        if total > limit {
            return Err(FuelAuthError::ExceedsAmountLimit {
                attempted: total,
                limit,
            });
        }
    }

    Ok(effective_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fleethub_entity::fuel::AuthorizationStatus;
    use uuid::Uuid;

    fn authorization(
        max_quantity_litres: Option<f64>,
        max_amount_dollars: Option<f64>,
    ) -> FuelAuthorization {
        let now = Utc::now();
        FuelAuthorization {
            id: Uuid::new_v4(),
            organisation_id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            operator_session_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            auth_code: "W4XZ38".to_string(),
            qr_code_data: String::new(),
            status: AuthorizationStatus::Authorized,
            max_quantity_litres,
            max_amount_dollars,
            requested_at: now,
            expires_at: now + Duration::minutes(30),
            authorized_at: Some(now),
            completed_at: None,
            cancelled_at: None,
            fuel_transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_within_limits_passes() {
        let auth = authorization(Some(40.0), Some(120.0));
        let total = enforce_limits(&auth, 35.0, None, Some(100.0)).expect("within limits");
        assert_eq!(total, Some(100.0));
    }

    #[test]
    fn test_quantity_over_limit_fails() {
        let auth = authorization(Some(50.0), None);
        let err = enforce_limits(&auth, 50.5, None, None).unwrap_err();
        match err {
            FuelAuthError::ExceedsQuantityLimit { attempted, limit } => {
                assert_eq!(attempted, 50.5);
                assert_eq!(limit, 50.0);
            }
            other => panic!("expected ExceedsQuantityLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_quantity_at_limit_passes() {
        let auth = authorization(Some(50.0), None);
        assert!(enforce_limits(&auth, 50.0, None, None).is_ok());
    }

    #[test]
    fn test_amount_derived_from_unit_cost() {
        let auth = authorization(None, Some(100.0));
        // 2.10/L * 50L = 105 > 100
        let err = enforce_limits(&auth, 50.0, Some(2.10), None).unwrap_err();
        match err {
            FuelAuthError::ExceedsAmountLimit { attempted, limit } => {
                assert!((attempted - 105.0).abs() < 1e-9);
                assert_eq!(limit, 100.0);
            }
            other => panic!("expected ExceedsAmountLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_total_wins_over_unit_cost() {
        let auth = authorization(None, Some(100.0));
        let total =
            enforce_limits(&auth, 50.0, Some(9.99), Some(95.0)).expect("explicit total in limit");
        assert_eq!(total, Some(95.0));
    }

    #[test]
    fn test_no_cost_information_passes_amount_check() {
        let auth = authorization(None, Some(100.0));
        let total = enforce_limits(&auth, 50.0, None, None).expect("no cost to check");
        assert_eq!(total, None);
    }

    #[test]
    fn test_uncapped_authorization_accepts_anything() {
        let auth = authorization(None, None);
        assert!(enforce_limits(&auth, 900.0, Some(3.0), None).is_ok());
    }
}
