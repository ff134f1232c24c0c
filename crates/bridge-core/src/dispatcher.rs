//! # Webhook Event Dispatcher
//!
//! Verifies inbound webhook calls, translates the supported event kind into
//! the internal domain event, and acknowledges everything that carries a
//! valid signature. Single pass per call, no retained state.

use crate::error::BridgeResult;
use crate::event::{
    EventKind, OutboundPaymentEvent, VerifiedEvent, WebhookEnvelope, ORDER_ID_METADATA_KEY,
    PAYMENT_SUCCEEDED_TOPIC,
};
use crate::processor::BoxedProcessor;
use crate::publisher::BoxedPublisher;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Acknowledgment returned for every verified event.
///
/// The processor stops redelivery only on a 2xx, so unmatched-but-valid
/// kinds must still produce one; otherwise every consumer of the endpoint
/// gets a redelivery storm for events this service never handles.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    /// Echo of the verified signature header
    pub signature: String,
}

/// Routes verified processor events to the broker.
pub struct WebhookDispatcher {
    processor: BoxedProcessor,
    publisher: BoxedPublisher,
}

impl WebhookDispatcher {
    pub fn new(processor: BoxedProcessor, publisher: BoxedPublisher) -> Self {
        Self {
            processor,
            publisher,
        }
    }

    /// Verify, route, acknowledge.
    ///
    /// Verification failure is the only error path. Every failure downstream
    /// of a valid signature (missing payload fields, broker unreachable) is
    /// logged and swallowed: converting an internal failure into a non-2xx
    /// would make the processor redeliver to all interested parties, not
    /// repair this one consumer.
    #[instrument(skip(self, envelope))]
    pub async fn handle(&self, envelope: WebhookEnvelope) -> BridgeResult<WebhookAck> {
        let event = self
            .processor
            .verify_event(&envelope.raw_body, &envelope.signature_header)
            .await?;

        info!(
            event_id = %event.event_id,
            kind = event.kind.as_str(),
            "Verified webhook event"
        );

        match &event.kind {
            EventKind::ChargeSucceeded => self.publish_charge_succeeded(&event).await,
            EventKind::Other(kind) => {
                info!(kind = kind.as_str(), "Event kind not handled");
            }
        }

        Ok(WebhookAck {
            signature: envelope.signature_header,
        })
    }

    async fn publish_charge_succeeded(&self, event: &VerifiedEvent) {
        let charge = &event.payload;

        let Some(stripe_payment_id) = charge.get("id").and_then(|v| v.as_str()) else {
            warn!(event_id = %event.event_id, "Charge event carries no id, skipping publish");
            return;
        };

        // The originating order, if the metadata survived the round trip.
        // A charge without it is published with a null order id; this
        // component cannot recover the order and must not block the ack.
        let order_id = charge
            .get("metadata")
            .and_then(|m| m.get(ORDER_ID_METADATA_KEY))
            .and_then(|v| v.as_str())
            .map(String::from);

        if order_id.is_none() {
            warn!(event_id = %event.event_id, "Charge event carries no order id");
        }

        let receipt_url = charge
            .get("receipt_url")
            .and_then(|v| v.as_str())
            .map(String::from);

        let outbound = OutboundPaymentEvent {
            stripe_payment_id: stripe_payment_id.to_string(),
            order_id,
            receipt_url,
        };

        if let Err(err) = self
            .publisher
            .emit(PAYMENT_SUCCEEDED_TOPIC, &outbound)
            .await
        {
            error!(
                event_id = %event.event_id,
                payment_id = %outbound.stripe_payment_id,
                "Failed to publish payment event: {err}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BridgeError, BridgeResult};
    use crate::processor::{PaymentProcessor, ProcessorSession, ProcessorSessionRequest};
    use crate::publisher::EventPublisher;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Verifies only the signature header `VALID_SIGNATURE`, answering with
    /// a canned event decoded from the configured JSON
    struct StaticProcessor {
        event_type: String,
        payload: serde_json::Value,
    }

    const VALID_SIGNATURE: &str = "t=1700000000,v1=feedface";

    impl StaticProcessor {
        fn new(event_type: &str, payload: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                event_type: event_type.to_string(),
                payload,
            })
        }
    }

    #[async_trait]
    impl PaymentProcessor for StaticProcessor {
        async fn create_session(
            &self,
            _request: &ProcessorSessionRequest,
        ) -> BridgeResult<ProcessorSession> {
            unimplemented!("not used by dispatcher tests")
        }

        async fn verify_event(
            &self,
            _payload: &[u8],
            signature_header: &str,
        ) -> BridgeResult<VerifiedEvent> {
            if signature_header != VALID_SIGNATURE {
                return Err(BridgeError::SignatureVerification(
                    "Signature mismatch".to_string(),
                ));
            }
            Ok(VerifiedEvent {
                event_id: "evt_1".to_string(),
                kind: EventKind::from_type(&self.event_type),
                payload: self.payload.as_object().unwrap().clone(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    /// Records published events; can be configured to fail every publish
    struct RecordingPublisher {
        published: Mutex<Vec<(String, OutboundPaymentEvent)>>,
        fail: bool,
    }

    impl RecordingPublisher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn count(&self) -> usize {
            self.published.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn emit(&self, topic: &str, event: &OutboundPaymentEvent) -> BridgeResult<()> {
            if self.fail {
                return Err(BridgeError::Publish("broker unreachable".to_string()));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), event.clone()));
            Ok(())
        }
    }

    fn envelope(signature: &str) -> WebhookEnvelope {
        WebhookEnvelope {
            raw_body: b"{}".to_vec(),
            signature_header: signature.to_string(),
        }
    }

    fn charge_payload() -> serde_json::Value {
        json!({
            "id": "ch_1",
            "metadata": { "orderId": "O1" },
            "receipt_url": "https://r"
        })
    }

    #[tokio::test]
    async fn test_invalid_signature_rejected_without_publish() {
        let processor = StaticProcessor::new("charge.succeeded", charge_payload());
        let publisher = RecordingPublisher::new();
        let dispatcher = WebhookDispatcher::new(processor, publisher.clone());

        let err = dispatcher
            .handle(envelope("t=1,v1=tampered"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::SignatureVerification(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(publisher.count(), 0);
    }

    #[tokio::test]
    async fn test_charge_succeeded_publishes_exactly_once() {
        let processor = StaticProcessor::new("charge.succeeded", charge_payload());
        let publisher = RecordingPublisher::new();
        let dispatcher = WebhookDispatcher::new(processor, publisher.clone());

        let ack = dispatcher.handle(envelope(VALID_SIGNATURE)).await.unwrap();
        assert_eq!(ack.signature, VALID_SIGNATURE);

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, PAYMENT_SUCCEEDED_TOPIC);
        assert_eq!(
            published[0].1,
            OutboundPaymentEvent {
                stripe_payment_id: "ch_1".to_string(),
                order_id: Some("O1".to_string()),
                receipt_url: Some("https://r".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unmatched_kind_acknowledged_without_publish() {
        let processor = StaticProcessor::new("charge.refunded", charge_payload());
        let publisher = RecordingPublisher::new();
        let dispatcher = WebhookDispatcher::new(processor, publisher.clone());

        let ack = dispatcher.handle(envelope(VALID_SIGNATURE)).await.unwrap();

        assert_eq!(ack.signature, VALID_SIGNATURE);
        assert_eq!(publisher.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_order_id_publishes_null() {
        let processor = StaticProcessor::new(
            "charge.succeeded",
            json!({ "id": "ch_1", "receipt_url": "https://r" }),
        );
        let publisher = RecordingPublisher::new();
        let dispatcher = WebhookDispatcher::new(processor, publisher.clone());

        dispatcher.handle(envelope(VALID_SIGNATURE)).await.unwrap();

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1.order_id, None);
        assert_eq!(published[0].1.stripe_payment_id, "ch_1");
    }

    #[tokio::test]
    async fn test_missing_charge_id_skips_publish_but_acknowledges() {
        let processor = StaticProcessor::new(
            "charge.succeeded",
            json!({ "metadata": { "orderId": "O1" } }),
        );
        let publisher = RecordingPublisher::new();
        let dispatcher = WebhookDispatcher::new(processor, publisher.clone());

        let ack = dispatcher.handle(envelope(VALID_SIGNATURE)).await;

        assert!(ack.is_ok());
        assert_eq!(publisher.count(), 0);
    }

    #[tokio::test]
    async fn test_publish_failure_swallowed_after_valid_signature() {
        let processor = StaticProcessor::new("charge.succeeded", charge_payload());
        let publisher = RecordingPublisher::failing();
        let dispatcher = WebhookDispatcher::new(processor, publisher);

        // The ack contract holds even when the broker is down
        let ack = dispatcher.handle(envelope(VALID_SIGNATURE)).await;
        assert!(ack.is_ok());
    }
}
