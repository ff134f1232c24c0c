//! # Checkout Session Builder
//!
//! Turns a validated session request into a processor session and returns
//! the redirect-target summary. The processor owns all session state; this
//! component keeps none.

use crate::error::BridgeResult;
use crate::event::ORDER_ID_METADATA_KEY;
use crate::processor::{BoxedProcessor, ProcessorLineItem, ProcessorSessionRequest};
use crate::session::{CheckoutSessionResult, PaymentSessionRequest, RedirectUrls};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Builds hosted checkout sessions against an injected processor.
pub struct SessionBuilder {
    processor: BoxedProcessor,
    urls: RedirectUrls,
}

impl SessionBuilder {
    pub fn new(processor: BoxedProcessor, urls: RedirectUrls) -> Self {
        Self { processor, urls }
    }

    /// Validate, convert to processor line items, and create the session.
    ///
    /// The order ID rides as opaque metadata so the eventual webhook payload
    /// carries it back; the processor does not otherwise know the internal
    /// order identity.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, items = request.items.len()))]
    pub async fn build_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> BridgeResult<CheckoutSessionResult> {
        let currency = request.validate()?;

        let line_items = request
            .items
            .iter()
            .map(|item| ProcessorLineItem {
                name: item.name.clone(),
                unit_amount: currency.to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect();

        let mut metadata = HashMap::new();
        metadata.insert(ORDER_ID_METADATA_KEY.to_string(), request.order_id.clone());

        let session = self
            .processor
            .create_session(&ProcessorSessionRequest {
                currency,
                line_items,
                metadata,
                success_url: self.urls.success_url.clone(),
                cancel_url: self.urls.cancel_url.clone(),
            })
            .await?;

        info!(session_id = %session.session_id, "Created checkout session");

        Ok(CheckoutSessionResult {
            url: session.url,
            success_url: session
                .success_url
                .unwrap_or_else(|| self.urls.success_url.clone()),
            cancel_url: session
                .cancel_url
                .unwrap_or_else(|| self.urls.cancel_url.clone()),
        })
    }
}
