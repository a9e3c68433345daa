//! Wire models for the fuel-backend API.
//!
//! The upstream API is inconsistent about response shapes: transaction
//! pages arrive as either `data` or `transactions`, and the cursor as
//! either `next_cursor` or `nextCursor`. Everything is normalized here
//! so the sync engine only ever sees one canonical shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw fuel transaction as reported by the external backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalFuelTransaction {
    /// The backend's transaction id (our dedup key).
    pub id: String,
    /// Authorization code keyed in at the pump, if any.
    #[serde(default, alias = "authorizationCode")]
    pub authorization_code: Option<String>,
    /// Vehicle registration plate as captured at the pump.
    #[serde(default, alias = "vehicleRegistration")]
    pub vehicle_registration: Option<String>,
    /// Backend-side vehicle identifier (our asset number).
    #[serde(default, alias = "vehicleId")]
    pub vehicle_id: Option<String>,
    /// Litres dispensed.
    #[serde(alias = "quantityLitres")]
    pub quantity_litres: f64,
    /// Cost per litre.
    #[serde(default, alias = "unitCost")]
    pub unit_cost: Option<f64>,
    /// Total cost.
    #[serde(default, alias = "totalCost")]
    pub total_cost: Option<f64>,
    /// Fuel type dispensed.
    #[serde(default, alias = "fuelType")]
    pub fuel_type: Option<String>,
    /// Odometer reading keyed in at the pump.
    #[serde(default)]
    pub odometer: Option<f64>,
    /// When the fuel was dispensed.
    #[serde(alias = "transactionDate")]
    pub transaction_date: DateTime<Utc>,
    /// Site/bowser location name.
    #[serde(default, alias = "siteName")]
    pub site_name: Option<String>,
    /// Fuel vendor.
    #[serde(default)]
    pub vendor: Option<String>,
}

/// A transactions page exactly as the backend sends it, tolerant of
/// both field spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransactionsPage {
    /// Transaction list under the `data` key.
    #[serde(default)]
    pub data: Option<Vec<ExternalFuelTransaction>>,
    /// Transaction list under the `transactions` key.
    #[serde(default)]
    pub transactions: Option<Vec<ExternalFuelTransaction>>,
    /// Pagination cursor, either spelling.
    #[serde(default, alias = "nextCursor")]
    pub next_cursor: Option<String>,
    /// Whether more pages remain, if the backend says so explicitly.
    #[serde(default, alias = "hasMore")]
    pub has_more: Option<bool>,
}

impl RawTransactionsPage {
    /// Collapse the two upstream shapes into the canonical page.
    pub fn normalize(self) -> TransactionsPage {
        let transactions = self
            .data
            .or(self.transactions)
            .unwrap_or_default();
        let next_cursor = match self.has_more {
            Some(false) => None,
            _ => self.next_cursor.filter(|c| !c.is_empty()),
        };
        TransactionsPage {
            transactions,
            next_cursor,
        }
    }
}

/// The canonical transactions page the sync engine consumes.
#[derive(Debug, Clone)]
pub struct TransactionsPage {
    /// Transactions on this page.
    pub transactions: Vec<ExternalFuelTransaction>,
    /// Cursor for the next page, absent on the last page.
    pub next_cursor: Option<String>,
}

/// Reported operational status of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    /// Fully operational.
    Online,
    /// Operational with degraded performance.
    Degraded,
    /// Unreachable or reporting an outage.
    Offline,
    /// In a scheduled maintenance window.
    Maintenance,
}

/// Result of a backend health check. Never an error: client failures
/// are folded into a degraded/offline result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    /// Whether the backend is usable.
    pub healthy: bool,
    /// Reported or inferred status.
    pub status: BackendStatus,
    /// Round-trip time of the health request.
    pub response_time_ms: u64,
    /// Backend version string, if reported.
    pub version: Option<String>,
    /// Error description when unhealthy.
    pub error: Option<String>,
}

/// Raw `GET /health` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawHealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// `POST /authorizations/verify` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAuthorizationResponse {
    /// Whether the backend recognises the code as valid.
    pub valid: bool,
    /// Backend-side authorization status, if reported.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /transactions` request body: pushes a locally-recorded
/// transaction to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTransactionRequest {
    /// Our transaction id.
    pub internal_id: String,
    /// The authorization code the dispense was made under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
    /// Backend-side vehicle identifier (our asset number).
    pub vehicle_id: String,
    /// Backend-side driver identifier, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    /// Litres dispensed.
    pub quantity_litres: f64,
    /// Total cost, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    /// When the fuel was dispensed.
    pub transaction_date: DateTime<Utc>,
    /// Dispense location latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Dispense location longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_data_shape() {
        let raw: RawTransactionsPage = serde_json::from_str(
            r#"{
                "data": [{
                    "id": "ext-1",
                    "quantity_litres": 42.5,
                    "transaction_date": "2026-08-01T10:30:00Z"
                }],
                "next_cursor": "abc123"
            }"#,
        )
        .expect("parse");
        let page = raw.normalize();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].id, "ext-1");
        assert_eq!(page.next_cursor.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_normalize_transactions_shape_with_camel_cursor() {
        let raw: RawTransactionsPage = serde_json::from_str(
            r#"{
                "transactions": [{
                    "id": "ext-2",
                    "quantityLitres": 10.0,
                    "transactionDate": "2026-08-01T11:00:00Z",
                    "authorizationCode": "k7m2p9"
                }],
                "nextCursor": "def456"
            }"#,
        )
        .expect("parse");
        let page = raw.normalize();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].quantity_litres, 10.0);
        assert_eq!(
            page.transactions[0].authorization_code.as_deref(),
            Some("k7m2p9")
        );
        assert_eq!(page.next_cursor.as_deref(), Some("def456"));
    }

    #[test]
    fn test_normalize_empty_page() {
        let raw: RawTransactionsPage = serde_json::from_str("{}").expect("parse");
        let page = raw.normalize();
        assert!(page.transactions.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_has_more_false_clears_cursor() {
        let raw: RawTransactionsPage = serde_json::from_str(
            r#"{"data": [], "next_cursor": "stale", "hasMore": false}"#,
        )
        .expect("parse");
        assert!(raw.normalize().next_cursor.is_none());
    }

    #[test]
    fn test_report_request_serializes_camel_case() {
        let req = ReportTransactionRequest {
            internal_id: "11111111-2222-3333-4444-555555555555".to_string(),
            authorization_code: Some("K7M2P9".to_string()),
            vehicle_id: "TRK-042".to_string(),
            driver_id: None,
            quantity_litres: 35.0,
            total_cost: Some(100.0),
            transaction_date: Utc::now(),
            latitude: None,
            longitude: None,
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert!(json.get("internalId").is_some());
        assert!(json.get("vehicleId").is_some());
        assert!(json.get("quantityLitres").is_some());
        assert!(json.get("driverId").is_none());
    }
}
