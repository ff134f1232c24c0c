//! # bridge-nats
//!
//! NATS-backed `EventPublisher` for the payment bridge.
//!
//! Publishes are fire-and-forget: `async-nats` buffers the write on the
//! connection and no broker acknowledgment is awaited. Delivery guarantees
//! beyond that are the broker's contract.

use async_nats::Client;
use async_trait::async_trait;
use bridge_core::{BridgeError, BridgeResult, EventPublisher, OutboundPaymentEvent};
use tracing::{debug, info};

/// NATS event publisher
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    /// Connect to NATS at the given URL
    pub async fn connect(url: &str) -> BridgeResult<Self> {
        info!(url = %url, "Connecting to NATS");

        let client = async_nats::ConnectOptions::new()
            .name("payment-bridge")
            .connect(url)
            .await
            .map_err(|e| BridgeError::Network(format!("NATS connect failed: {}", e)))?;

        info!("Connected to NATS");

        Ok(Self { client })
    }

    /// Wrap an existing client (shared connections, tests)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn emit(&self, topic: &str, event: &OutboundPaymentEvent) -> BridgeResult<()> {
        let payload =
            serde_json::to_vec(event).map_err(|e| BridgeError::Serialization(e.to_string()))?;

        debug!(topic = topic, payment_id = %event.stripe_payment_id, "Publishing payment event");

        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| BridgeError::Publish(e.to_string()))?;

        Ok(())
    }
}
