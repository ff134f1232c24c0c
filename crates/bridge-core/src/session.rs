//! # Checkout Session Types
//!
//! Session request/response types and minor-unit price conversion.

use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Parse a currency code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Currency> {
        match code.to_lowercase().as_str() {
            "usd" => Some(Currency::USD),
            "eur" => Some(Currency::EUR),
            "gbp" => Some(Currency::GBP),
            "jpy" => Some(Currency::JPY),
            "cad" => Some(Currency::CAD),
            "aud" => Some(Currency::AUD),
            "chf" => Some(Currency::CHF),
            "mxn" => Some(Currency::MXN),
            _ => None,
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents, etc.).
    ///
    /// Rounds half-up rather than truncating; truncation would systematically
    /// underprice line items.
    pub fn to_minor_units(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One purchasable line in a session request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    /// Display name shown on the hosted checkout page
    pub name: String,

    /// Unit price in decimal currency units
    pub price: f64,

    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Inbound request to create a hosted checkout session.
///
/// Immutable input; `validate` is a defensive second check on top of
/// whatever field-level validation the HTTP layer already applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    /// Internal order identifier, round-tripped through processor metadata
    pub order_id: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// Items to purchase
    #[serde(default)]
    pub items: Vec<SessionItem>,
}

impl PaymentSessionRequest {
    /// Validate the request shape and resolve the currency.
    ///
    /// Rejects empty item lists, non-positive prices, and zero quantities.
    pub fn validate(&self) -> BridgeResult<Currency> {
        if self.order_id.trim().is_empty() {
            return Err(BridgeError::Validation("orderId must not be empty".to_string()));
        }

        if self.currency.trim().is_empty() {
            return Err(BridgeError::Validation("currency must not be empty".to_string()));
        }

        let currency = Currency::from_code(&self.currency).ok_or_else(|| {
            BridgeError::UnsupportedCurrency {
                currency: self.currency.clone(),
            }
        })?;

        if self.items.is_empty() {
            return Err(BridgeError::Validation(
                "at least one item is required".to_string(),
            ));
        }

        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(BridgeError::Validation("item name must not be empty".to_string()));
            }
            if !(item.price > 0.0) {
                return Err(BridgeError::Validation(format!(
                    "item '{}' must have a positive price",
                    item.name
                )));
            }
            if item.quantity < 1 {
                return Err(BridgeError::Validation(format!(
                    "item '{}' must have a quantity of at least 1",
                    item.name
                )));
            }
        }

        Ok(currency)
    }
}

/// Redirect-target summary returned to the caller.
///
/// Deliberately just three fields; the full processor response never leaves
/// the processor crate, so callers cannot couple to its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResult {
    /// Hosted checkout page URL (null if the processor withheld one)
    pub url: Option<String>,

    /// Redirect target after successful payment
    pub success_url: String,

    /// Redirect target if the customer cancels
    pub cancel_url: String,
}

/// Configured redirect targets for the hosted checkout page
#[derive(Debug, Clone)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}
