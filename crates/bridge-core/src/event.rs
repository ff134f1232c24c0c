//! # Webhook Event Types
//!
//! Inbound webhook envelope, the verified event produced by signature
//! verification, and the outbound domain event published for downstream
//! consumers.

use serde::{Deserialize, Serialize};

/// Topic the domain event is published under
pub const PAYMENT_SUCCEEDED_TOPIC: &str = "payment.succeeded";

/// Metadata key correlating a webhook back to the originating order.
/// This is the sole mechanism tying a charge event to an internal order.
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Raw inbound webhook call, request-scoped.
///
/// The body stays raw bytes until the signature is verified; verification
/// operates on the exact bytes the processor signed.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    pub raw_body: Vec<u8>,
    pub signature_header: String,
}

/// Event kinds this service routes on.
///
/// The external taxonomy is large; everything outside the supported set
/// passes through as `Other` and is acknowledged without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A charge completed successfully
    ChargeSucceeded,
    /// Any event kind this service does not act on
    Other(String),
}

impl EventKind {
    /// Map a processor event tag onto the routed kind
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "charge.succeeded" => EventKind::ChargeSucceeded,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// The processor's raw event tag
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::ChargeSucceeded => "charge.succeeded",
            EventKind::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A webhook event whose signature has been verified.
///
/// Only successful verification produces one of these; the payload is the
/// event's inner object, untyped because its shape varies by kind.
#[derive(Debug, Clone)]
pub struct VerifiedEvent {
    /// Event ID assigned by the processor
    pub event_id: String,

    /// Routed kind
    pub kind: EventKind,

    /// The event's data object
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// The only internal contract surfaced to the rest of the platform.
///
/// Field names and presence are stable regardless of which processor event
/// produced it; absent values serialize as `null`, never disappear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundPaymentEvent {
    pub stripe_payment_id: String,
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_mapping() {
        assert_eq!(
            EventKind::from_type("charge.succeeded"),
            EventKind::ChargeSucceeded
        );
        assert_eq!(
            EventKind::from_type("charge.refunded"),
            EventKind::Other("charge.refunded".to_string())
        );
        assert_eq!(EventKind::from_type("charge.refunded").as_str(), "charge.refunded");
    }

    #[test]
    fn test_outbound_event_wire_format() {
        let event = OutboundPaymentEvent {
            stripe_payment_id: "ch_1".to_string(),
            order_id: Some("O1".to_string()),
            receipt_url: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stripePaymentId"], "ch_1");
        assert_eq!(json["orderId"], "O1");
        // Absent values stay present as null
        assert!(json["receiptUrl"].is_null());
    }
}
