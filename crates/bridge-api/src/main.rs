//! # Payment Bridge
//!
//! Stripe checkout session + webhook adapter publishing payment events to
//! NATS.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export NATS_URL=nats://127.0.0.1:4222
//!
//! # Run the server
//! payment-bridge
//! ```

use bridge_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state (connects to NATS)
    let state = AppState::new().await?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Publishing payment events to {}", state.config.nats_url);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Payments microservice running on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/api/v1/payments/session", addr);
        info!("Webhook: POST http://{}/webhook/stripe", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
