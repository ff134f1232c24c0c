//! # Error Types
//!
//! Typed error handling for the payment bridge.
//! All operations return `Result<T, BridgeError>`.

use thiserror::Error;

/// Core error type for all bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session request failed the defensive shape check
    #[error("Invalid session request: {0}")]
    Validation(String),

    /// Currency code not in the supported set
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment processor API error
    #[error("Processor error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    SignatureVerification(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Broker publish failed
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BridgeError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Verification failures map to 400, not 401: the webhook caller treats
    /// any non-2xx as "redeliver", and 400 is the agreed terminal rejection.
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::Configuration(_) => 500,
            BridgeError::Validation(_) => 400,
            BridgeError::UnsupportedCurrency { .. } => 400,
            BridgeError::Provider { .. } => 502,
            BridgeError::Network(_) => 503,
            BridgeError::SignatureVerification(_) => 400,
            BridgeError::WebhookParse(_) => 400,
            BridgeError::Publish(_) => 500,
            BridgeError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BridgeError::Validation("empty items".into()).status_code(),
            400
        );
        assert_eq!(
            BridgeError::SignatureVerification("mismatch".into()).status_code(),
            400
        );
        assert_eq!(
            BridgeError::Provider {
                provider: "stripe".into(),
                message: "invalid api key".into()
            }
            .status_code(),
            502
        );
        assert_eq!(BridgeError::Network("timeout".into()).status_code(), 503);
    }
}
