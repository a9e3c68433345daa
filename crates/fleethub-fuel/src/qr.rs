//! QR payload codec for fuel authorizations.
//!
//! The payload embeds enough identity and limit information for an
//! offline bowser scanner to display and sanity-check a code without a
//! live call. It is advisory only: every authorization decision is made
//! server-side against the state machine, never against client-supplied
//! QR content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current payload wire version.
pub const QR_PAYLOAD_VERSION: u32 = 1;

/// The versioned JSON payload carried on a scannable code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    /// Wire format version.
    pub v: u32,
    /// The authorization code.
    pub code: String,
    /// The asset to be fuelled.
    pub asset_id: Uuid,
    /// Fleet-internal asset number, for display.
    #[serde(default)]
    pub asset_number: String,
    /// Requesting operator's name, for display.
    #[serde(default)]
    pub operator_name: String,
    /// The organisation.
    pub org_id: Uuid,
    /// End of the validity window.
    pub expires_at: DateTime<Utc>,
    /// Maximum litres, if capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_litres: Option<f64>,
    /// Maximum dollar amount, if capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dollars: Option<f64>,
}

impl QrPayload {
    /// Build a version-1 payload for a freshly issued authorization.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: impl Into<String>,
        asset_id: Uuid,
        asset_number: impl Into<String>,
        operator_name: impl Into<String>,
        org_id: Uuid,
        expires_at: DateTime<Utc>,
        max_litres: Option<f64>,
        max_dollars: Option<f64>,
    ) -> Self {
        Self {
            v: QR_PAYLOAD_VERSION,
            code: code.into(),
            asset_id,
            asset_number: asset_number.into(),
            operator_name: operator_name.into(),
            org_id,
            expires_at,
            max_litres,
            max_dollars,
        }
    }

    /// Serialize the payload to its JSON wire form.
    pub fn encode(&self) -> String {
        // QrPayload contains no map keys or non-string-serializable types,
        // so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse and structurally validate a payload.
    ///
    /// Returns `None` on any malformed input: unknown version, missing
    /// required fields, or JSON that does not parse. Callers must treat
    /// `None` as "cannot trust this code" and fall back to the
    /// authoritative server-side validate operation.
    pub fn decode(payload: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(payload).ok()?;
        if parsed.v != QR_PAYLOAD_VERSION {
            return None;
        }
        if parsed.code.is_empty() {
            return None;
        }
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> QrPayload {
        QrPayload::new(
            "K7M2P9",
            Uuid::new_v4(),
            "TRK-042",
            "Dana Whetu",
            Uuid::new_v4(),
            Utc::now() + Duration::minutes(30),
            Some(40.0),
            Some(120.0),
        )
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = sample();
        let encoded = payload.encode();
        let decoded = QrPayload::decode(&encoded).expect("decode");
        assert_eq!(decoded.code, payload.code);
        assert_eq!(decoded.asset_id, payload.asset_id);
        assert_eq!(decoded.max_litres, Some(40.0));
    }

    #[test]
    fn test_wire_keys_are_camel_case() {
        let json: serde_json::Value =
            serde_json::from_str(&sample().encode()).expect("valid json");
        assert_eq!(json["v"], 1);
        assert!(json.get("assetId").is_some());
        assert!(json.get("orgId").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("maxLitres").is_some());
    }

    #[test]
    fn test_limits_omitted_when_uncapped() {
        let mut payload = sample();
        payload.max_litres = None;
        payload.max_dollars = None;
        let json: serde_json::Value =
            serde_json::from_str(&payload.encode()).expect("valid json");
        assert!(json.get("maxLitres").is_none());
        assert!(json.get("maxDollars").is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(QrPayload::decode("not json at all").is_none());
        assert!(QrPayload::decode("").is_none());
        assert!(QrPayload::decode("{\"v\":1}").is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut payload = sample();
        payload.v = 2;
        assert!(QrPayload::decode(&payload.encode()).is_none());
    }

    #[test]
    fn test_decode_rejects_empty_code() {
        let mut payload = sample();
        payload.code = String::new();
        assert!(QrPayload::decode(&payload.encode()).is_none());
    }

    #[test]
    fn test_decode_tolerates_missing_display_fields() {
        let payload = sample();
        let mut json: serde_json::Value =
            serde_json::from_str(&payload.encode()).expect("valid json");
        json.as_object_mut().expect("object").remove("assetNumber");
        json.as_object_mut().expect("object").remove("operatorName");
        let decoded = QrPayload::decode(&json.to_string()).expect("decode");
        assert_eq!(decoded.asset_number, "");
    }
}
