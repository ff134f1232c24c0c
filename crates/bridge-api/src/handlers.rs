//! # Request Handlers
//!
//! Axum request handlers for the payment bridge API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bridge_core::{
    BridgeError, CheckoutSessionResult, PaymentSessionRequest, WebhookAck, WebhookEnvelope,
};
use serde::Serialize;
use tracing::{error, instrument};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn bridge_error_to_response(err: BridgeError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-bridge",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session
#[instrument(skip(state, request), fields(order_id = %request.order_id, items = request.items.len()))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<PaymentSessionRequest>,
) -> Result<Json<CheckoutSessionResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = state.builder.build_session(&request).await.map_err(|e| {
        error!("Failed to create checkout session: {}", e);
        bridge_error_to_response(e)
    })?;

    Ok(Json(result))
}

/// Handle a Stripe webhook callback.
///
/// The body is taken raw; an absent signature header goes through the same
/// rejection path as an invalid one.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, Json<ErrorResponse>)> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let envelope = WebhookEnvelope {
        raw_body: body.to_vec(),
        signature_header: signature.to_string(),
    };

    let ack = state.dispatcher.handle(envelope).await.map_err(|e| {
        error!("Webhook rejected: {}", e);
        bridge_error_to_response(e)
    })?;

    Ok(Json(ack))
}
