// --- File: crates/paygate_stripe/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use paygate_common::{map_json_error, PaygateError};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::StripeError;
use crate::models::{
    PaymentSessionRequest, PaymentSessionResponse, RedirectResponse, SIGNATURE_HEADER,
};
use crate::service::PaymentsService;
use crate::webhook::ERR_HEADER_FORMAT;

/// Axum handler to create a Stripe Checkout Session.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/create-payment-session",
    request_body = PaymentSessionRequest,
    responses(
        (status = 200, description = "Stripe Checkout Session created", body = PaymentSessionResponse),
        (status = 400, description = "Request failed validation"),
        (status = 502, description = "Stripe API error")
    ),
    tag = "Payments"
))]
pub async fn create_payment_session_handler(
    State(service): State<Arc<PaymentsService>>,
    payload: Result<Json<PaymentSessionRequest>, JsonRejection>,
) -> Result<Json<PaymentSessionResponse>, Response> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected payment session request: {}", rejection.body_text());
        PaygateError::ValidationError(rejection.body_text()).into_response()
    })?;

    map_json_error(service.create_payment_session(request).await)
}

/// Stripe server-to-server notifications.
///
/// The body is taken as raw bytes: the signature covers the exact bytes Stripe sent.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/webhook",
    request_body(content = String, description = "Raw Stripe event JSON", content_type = "application/json"),
    params(("stripe-signature" = String, Header, description = "Stripe webhook signature")),
    responses(
        (status = 200, description = "Event verified and acknowledged", body = crate::models::WebhookAck),
        (status = 400, description = "Missing or invalid signature", content_type = "text/plain"),
        (status = 500, description = "Event could not be handed to the message bus")
    ),
    tag = "Payments"
))]
pub async fn stripe_webhook_handler(
    State(service): State<Arc<PaymentsService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // A present but non-ASCII header is malformed, not missing.
    let result = match headers.get(SIGNATURE_HEADER).map(|h| h.to_str()) {
        None => service.handle_webhook(&body, None).await,
        Some(Ok(sig)) => service.handle_webhook(&body, Some(sig)).await,
        Some(Err(_)) => Err(StripeError::WebhookSignatureError(ERR_HEADER_FORMAT.to_string())),
    };

    match result {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(StripeError::MissingSignature) => {
            warn!("Stripe webhook received without signature header");
            (StatusCode::BAD_REQUEST, "Missing Stripe signature.").into_response()
        }
        Err(e) if e.is_webhook_rejection() => {
            warn!("Stripe webhook rejected: {}", e);
            (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", e)).into_response()
        }
        Err(e) => {
            error!("Error processing Stripe webhook: {}", e);
            PaygateError::from(e).into_response()
        }
    }
}

// --- Redirect Handlers (Client-Side) ---
// Configured as the success_url and cancel_url of every session.

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/payments/success",
    responses((status = 200, description = "Checkout success", body = RedirectResponse)),
    tag = "Payments"
))]
pub async fn payment_success_handler() -> Json<RedirectResponse> {
    Json(RedirectResponse {
        ok: true,
        message: "Payment successful".to_string(),
    })
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/payments/cancel",
    responses((status = 200, description = "Checkout cancelled", body = RedirectResponse)),
    tag = "Payments"
))]
pub async fn payment_cancel_handler() -> Json<RedirectResponse> {
    Json(RedirectResponse {
        ok: false,
        message: "Payment cancelled".to_string(),
    })
}
