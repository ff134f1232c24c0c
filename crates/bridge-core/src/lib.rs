//! # bridge-core
//!
//! Core types and logic for the payment-bridge gateway adapter.
//!
//! This crate provides:
//! - `SessionBuilder` for turning order line items into hosted checkout
//!   sessions
//! - `WebhookDispatcher` for the verify → route → acknowledge pipeline
//! - `PaymentProcessor` and `EventPublisher` traits at the seams, so both
//!   components run against fakes in tests
//! - `BridgeError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use bridge_core::{RedirectUrls, SessionBuilder, WebhookDispatcher};
//!
//! let builder = SessionBuilder::new(processor.clone(), RedirectUrls::new(success, cancel));
//! let dispatcher = WebhookDispatcher::new(processor, publisher);
//!
//! // Checkout: redirect the customer to result.url
//! let result = builder.build_session(&request).await?;
//!
//! // Webhook: 400 on verification failure, 200 + ack otherwise
//! let ack = dispatcher.handle(envelope).await?;
//! ```

pub mod builder;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod processor;
pub mod publisher;
pub mod session;

// Re-exports for convenience
pub use builder::SessionBuilder;
pub use dispatcher::{WebhookAck, WebhookDispatcher};
pub use error::{BridgeError, BridgeResult};
pub use event::{
    EventKind, OutboundPaymentEvent, VerifiedEvent, WebhookEnvelope, ORDER_ID_METADATA_KEY,
    PAYMENT_SUCCEEDED_TOPIC,
};
pub use processor::{
    BoxedProcessor, PaymentProcessor, ProcessorLineItem, ProcessorSession,
    ProcessorSessionRequest,
};
pub use publisher::{BoxedPublisher, EventPublisher};
pub use session::{
    CheckoutSessionResult, Currency, PaymentSessionRequest, RedirectUrls, SessionItem,
};
