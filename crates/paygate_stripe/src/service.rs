// --- File: crates/paygate_stripe/src/service.rs ---
use paygate_common::{PaymentProvider, SharedEventPublisher};
use paygate_config::StripeConfig;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use crate::error::StripeError;
use crate::logic::{build_checkout_params, charge_succeeded_payload};
use crate::models::{
    PaymentSessionRequest, PaymentSessionResponse, StripeEvent, WebhookAck, WebhookOutcome,
    CHARGE_SUCCEEDED, PAYMENT_SUCCEEDED_PATTERN,
};
use crate::webhook::construct_event;

/// Shared handle to the checkout provider.
pub type SharedPaymentProvider = Arc<dyn PaymentProvider<Error = StripeError>>;

/// Opens checkout sessions and relays verified webhook events onto the bus.
///
/// Holds no per-request state; one instance is shared by every HTTP request
/// and every bus RPC call.
pub struct PaymentsService {
    provider: SharedPaymentProvider,
    publisher: SharedEventPublisher,
    stripe_config: StripeConfig,
}

impl PaymentsService {
    pub fn new(
        provider: SharedPaymentProvider,
        publisher: SharedEventPublisher,
        stripe_config: StripeConfig,
    ) -> Self {
        Self {
            provider,
            publisher,
            stripe_config,
        }
    }

    /// Validates the order, opens a hosted checkout session and returns its URLs.
    ///
    /// Provider failures are returned as-is; nothing is retried.
    pub async fn create_payment_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSessionResponse, StripeError> {
        request.validate()?;

        let params = build_checkout_params(&request, &self.stripe_config)?;
        let session = self.provider.create_checkout_session(params).await?;

        Ok(PaymentSessionResponse {
            url: session.url,
            success_url: session.success_url,
            cancel_url: session.cancel_url,
        })
    }

    /// Verifies a raw webhook delivery and dispatches it.
    ///
    /// Every verified event is acknowledged, handled or not, so Stripe does not redeliver it.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookAck, StripeError> {
        let sig = signature
            .filter(|s| !s.is_empty())
            .ok_or(StripeError::MissingSignature)?;

        let event = construct_event(
            payload,
            sig,
            &self.stripe_config.endpoint_secret,
            self.stripe_config.webhook_tolerance_secs,
        )?;

        let outcome = self.dispatch_event(event).await?;

        Ok(WebhookAck {
            sig: sig.to_string(),
            outcome,
        })
    }

    /// Branches on the event type. Only `charge.succeeded` reaches the bus.
    pub async fn dispatch_event(&self, event: StripeEvent) -> Result<WebhookOutcome, StripeError> {
        info!(
            "[Stripe Webhook] Processing event {} of type {} (livemode: {})",
            event.id, event.event_type, event.livemode
        );

        match event.event_type.as_str() {
            CHARGE_SUCCEEDED => {
                let payload = charge_succeeded_payload(&event)?;
                let value = serde_json::to_value(&payload)?;

                self.publisher
                    .emit(PAYMENT_SUCCEEDED_PATTERN, value)
                    .await
                    .map_err(|e| {
                        error!(
                            "[Stripe Webhook] Could not emit {} for charge {}: {}",
                            PAYMENT_SUCCEEDED_PATTERN, payload.stripe_payment_id, e
                        );
                        StripeError::PublishError(e)
                    })?;

                Ok(WebhookOutcome::Published(payload))
            }
            other => {
                info!("Event {} not handled", other);
                Ok(WebhookOutcome::Ignored(other.to_string()))
            }
        }
    }
}
