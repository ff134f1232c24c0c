//! # Event Publisher Trait
//!
//! Publish-capable handle to the message broker. The broker client owns
//! connection management, delivery guarantees, and concurrency safety.

use crate::error::BridgeResult;
use crate::event::OutboundPaymentEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound publish capability.
///
/// Implementations must be safe for concurrent use by overlapping requests.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Fire-and-forget publish.
    ///
    /// Resolving does not imply broker delivery; no acknowledgment is
    /// awaited at this layer.
    async fn emit(&self, topic: &str, event: &OutboundPaymentEvent) -> BridgeResult<()>;
}

/// Type alias for a shared publisher (dynamic dispatch)
pub type BoxedPublisher = Arc<dyn EventPublisher>;
