//! # Application State
//!
//! Shared state for the axum application. Both components receive their
//! collaborators as long-lived, explicitly constructed dependencies; there
//! is no ambient or static client state, so tests can run parallel
//! instances with different credentials.

use bridge_core::{
    BoxedProcessor, BoxedPublisher, RedirectUrls, SessionBuilder, WebhookDispatcher,
};
use bridge_nats::NatsPublisher;
use bridge_stripe::StripeProcessor;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Redirect target after successful payment
    pub success_url: String,
    /// Redirect target if the customer cancels
    pub cancel_url: String,
    /// NATS server URL
    pub nats_url: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:8080/checkout/success".to_string()),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:8080/checkout/cancel".to_string()),
            nats_url: std::env::var("NATS_URL")
                .unwrap_or_else(|_| "nats://127.0.0.1:4222".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout session builder
    pub builder: Arc<SessionBuilder>,
    /// Webhook event dispatcher
    pub dispatcher: Arc<WebhookDispatcher>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Wire the real Stripe and NATS collaborators from the environment
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let processor: BoxedProcessor = Arc::new(
            StripeProcessor::from_env()
                .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?,
        );

        let publisher: BoxedPublisher = Arc::new(
            NatsPublisher::connect(&config.nats_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to NATS: {}", e))?,
        );

        Ok(Self::with_components(processor, publisher, config))
    }

    /// Wire explicit collaborators (tests inject fakes here)
    pub fn with_components(
        processor: BoxedProcessor,
        publisher: BoxedPublisher,
        config: AppConfig,
    ) -> Self {
        let urls = RedirectUrls::new(&config.success_url, &config.cancel_url);

        Self {
            builder: Arc::new(SessionBuilder::new(processor.clone(), urls)),
            dispatcher: Arc::new(WebhookDispatcher::new(processor, publisher)),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("NATS_URL");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.nats_url, "nats://127.0.0.1:4222");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            success_url: "http://localhost:3000/checkout/success".to_string(),
            cancel_url: "http://localhost:3000/checkout/cancel".to_string(),
            nats_url: "nats://127.0.0.1:4222".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }
}
