//! # bridge-stripe
//!
//! Stripe implementation of the `PaymentProcessor` capability pair:
//!
//! 1. **Checkout Sessions** - hosted checkout page creation with dynamic
//!    line items and order metadata
//! 2. **Webhook verification** - HMAC-SHA256 signature checks over the raw
//!    request body, with timestamp tolerance and constant-time comparison
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bridge_stripe::StripeProcessor;
//!
//! // Create processor from environment
//! let processor = StripeProcessor::from_env()?;
//!
//! // Create checkout session
//! let session = processor.create_session(&request).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeProcessor;
pub use config::StripeConfig;
