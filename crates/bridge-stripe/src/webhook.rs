//! # Stripe Webhook Verification
//!
//! Signature verification for inbound Stripe webhooks. Verification operates
//! on the raw body bytes; the payload is only parsed as JSON after the
//! signature checks out.

use bridge_core::{BridgeError, BridgeResult, EventKind, VerifiedEvent};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

/// Maximum accepted distance between the signed timestamp and now
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> BridgeResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        BridgeError::SignatureVerification("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(BridgeError::SignatureVerification(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

/// Verify a webhook signature and decode the event.
///
/// The header carries `t=<unix>,v1=<hex>` components; the expected
/// signature is HMAC-SHA256 over `"{t}.{body}"` with the endpoint secret.
/// Stale timestamps are rejected to bound replay.
pub fn verify_event(
    secret: &str,
    payload: &[u8],
    signature_header: &str,
) -> BridgeResult<VerifiedEvent> {
    let sig_parts = parse_signature_header(signature_header)?;

    let now = Utc::now().timestamp();
    if (now - sig_parts.timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(BridgeError::SignatureVerification(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", sig_parts.timestamp, String::from_utf8_lossy(payload));
    let expected_sig = compute_hmac_sha256(secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(BridgeError::SignatureVerification(
            "Signature mismatch".to_string(),
        ));
    }

    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| BridgeError::WebhookParse(format!("Failed to parse webhook: {}", e)))?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    Ok(VerifiedEvent {
        event_id: event.id,
        kind: EventKind::from_type(&event.event_type),
        payload: event.data.object,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        format!(
            "t={},v1={}",
            timestamp,
            compute_hmac_sha256(secret, &signed_payload)
        )
    }

    fn charge_event() -> Vec<u8> {
        br#"{
            "id": "evt_1",
            "type": "charge.succeeded",
            "data": {
                "object": {
                    "id": "ch_1",
                    "metadata": { "orderId": "O1" },
                    "receipt_url": "https://r"
                }
            }
        }"#
        .to_vec()
    }

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures.len(), 2);
        assert_eq!(parsed.signatures[0], "abc123");
    }

    #[test]
    fn test_parse_signature_header_missing_parts() {
        assert!(parse_signature_header("").is_err());
        assert!(parse_signature_header("v1=abc123").is_err());
        assert!(parse_signature_header("t=1234567890").is_err());
    }

    #[test]
    fn test_valid_signature_decodes_event() {
        let payload = charge_event();
        let header = sign(&payload, SECRET, Utc::now().timestamp());

        let event = verify_event(SECRET, &payload, &header).unwrap();

        assert_eq!(event.event_id, "evt_1");
        assert_eq!(event.kind, EventKind::ChargeSucceeded);
        assert_eq!(
            event.payload.get("id").and_then(|v| v.as_str()),
            Some("ch_1")
        );
        assert_eq!(
            event
                .payload
                .get("metadata")
                .and_then(|m| m.get("orderId"))
                .and_then(|v| v.as_str()),
            Some("O1")
        );
    }

    #[test]
    fn test_tampered_body_rejected() {
        let payload = charge_event();
        let header = sign(&payload, SECRET, Utc::now().timestamp());

        let mut tampered = payload.clone();
        tampered.extend_from_slice(b" ");

        let err = verify_event(SECRET, &tampered, &header).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureVerification(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = charge_event();
        let header = sign(&payload, "whsec_other", Utc::now().timestamp());

        let err = verify_event(SECRET, &payload, &header).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureVerification(_)));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = charge_event();
        // 10 minutes ago, beyond the 5-minute tolerance
        let header = sign(&payload, SECRET, Utc::now().timestamp() - 600);

        let err = verify_event(SECRET, &payload, &header).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureVerification(_)));
    }

    #[test]
    fn test_unparseable_body_with_valid_signature() {
        let payload = b"not json".to_vec();
        let header = sign(&payload, SECRET, Utc::now().timestamp());

        let err = verify_event(SECRET, &payload, &header).unwrap_err();
        assert!(matches!(err, BridgeError::WebhookParse(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
