//! # Payment Processor Trait
//!
//! The capability pair owned by the external payment processor: hosted
//! session creation and webhook signature verification. Implementations
//! live in provider crates; tests inject fakes that simulate verification
//! failure and arbitrary event kinds without network access.

use crate::error::BridgeResult;
use crate::event::VerifiedEvent;
use crate::session::Currency;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A line item in processor minor units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorLineItem {
    /// Display name
    pub name: String,

    /// Unit price in the currency's smallest unit
    pub unit_amount: i64,

    /// Quantity
    pub quantity: u32,
}

/// Fully-prepared session request handed to the processor
#[derive(Debug, Clone)]
pub struct ProcessorSessionRequest {
    pub currency: Currency,
    pub line_items: Vec<ProcessorLineItem>,

    /// Opaque metadata round-tripped unchanged into webhook payloads
    pub metadata: HashMap<String, String>,

    pub success_url: String,
    pub cancel_url: String,
}

/// Session summary returned by the processor
#[derive(Debug, Clone)]
pub struct ProcessorSession {
    /// Processor's session ID
    pub session_id: String,

    /// Hosted checkout page URL
    pub url: Option<String>,

    /// Redirect URLs as the processor recorded them
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// Processor failure modes (network error, invalid API key, rate limit)
    /// propagate to the caller; no retry happens at this layer.
    async fn create_session(
        &self,
        request: &ProcessorSessionRequest,
    ) -> BridgeResult<ProcessorSession>;

    /// Verify a webhook signature over the raw body bytes and decode the
    /// event.
    ///
    /// Returns a `VerifiedEvent` only if authenticity is established; a
    /// verified envelope always decodes.
    async fn verify_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> BridgeResult<VerifiedEvent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedProcessor = Arc<dyn PaymentProcessor>;
