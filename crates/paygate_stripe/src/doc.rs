// --- File: crates/paygate_stripe/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{
    PaymentSessionItem, PaymentSessionRequest, PaymentSessionResponse, RedirectResponse,
    StripeEvent, StripeEventData, WebhookAck,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_payment_session_handler,
        crate::handlers::stripe_webhook_handler,
        crate::handlers::payment_success_handler,
        crate::handlers::payment_cancel_handler
    ),
    components(
        schemas(
            PaymentSessionRequest, PaymentSessionItem, PaymentSessionResponse,
            RedirectResponse, WebhookAck,
            StripeEvent, StripeEventData
        )
    ),
    tags(
        (name = "Payments", description = "Stripe checkout sessions and webhook relay")
    )
)]
pub struct PaymentsApiDoc;
