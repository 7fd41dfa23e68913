// --- File: crates/paygate_stripe/src/logic.rs ---
use paygate_common::{CheckoutLineItem, CheckoutSessionParams};
use paygate_config::StripeConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::error::StripeError;
use crate::models::{
    PaymentSessionItem, PaymentSessionRequest, PaymentSucceededPayload, StripeChargeObject,
    StripeEvent, ORDER_ID_METADATA_KEY,
};

/// Converts a major-unit price into Stripe's integer minor units.
///
/// `price × 100`, rounded half away from zero on the exact decimal value:
/// `9.995 → 1000`, `19.99 → 1999`.
pub fn to_minor_units(price: Decimal) -> Result<i64, StripeError> {
    let scaled = price
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| StripeError::InvalidAmount(format!("price {} is too large", price)))?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| StripeError::InvalidAmount(format!("price {} is out of range", price)))
}

/// Maps order items onto checkout line items.
pub fn build_line_items(items: &[PaymentSessionItem]) -> Result<Vec<CheckoutLineItem>, StripeError> {
    items
        .iter()
        .map(|item| {
            Ok(CheckoutLineItem {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_amount: to_minor_units(item.price)?,
            })
        })
        .collect()
}

/// Builds the provider-neutral session parameters for a validated request.
pub fn build_checkout_params(
    request: &PaymentSessionRequest,
    stripe_config: &StripeConfig,
) -> Result<CheckoutSessionParams, StripeError> {
    Ok(CheckoutSessionParams {
        currency: request.currency.to_lowercase(),
        order_id: request.order_id.clone(),
        line_items: build_line_items(&request.items)?,
        success_url: stripe_config.success_url.clone(),
        cancel_url: stripe_config.cancel_url.clone(),
    })
}

/// Form body for `POST /v1/checkout/sessions`.
pub fn checkout_form_body(params: &CheckoutSessionParams) -> Vec<(String, String)> {
    let mut form_body: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
        (
            format!("payment_intent_data[metadata][{}]", ORDER_ID_METADATA_KEY),
            params.order_id.clone(),
        ),
    ];

    for (i, item) in params.line_items.iter().enumerate() {
        form_body.push((
            format!("line_items[{}][price_data][currency]", i),
            params.currency.clone(),
        ));
        form_body.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.name.clone(),
        ));
        form_body.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        form_body.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    form_body
}

/// Extracts the bus payload from a `charge.succeeded` event.
pub fn charge_succeeded_payload(event: &StripeEvent) -> Result<PaymentSucceededPayload, StripeError> {
    let charge: StripeChargeObject = serde_json::from_value(event.data.object.clone())
        .map_err(|e| {
            StripeError::WebhookPayloadError(format!("Failed to parse charge object: {}", e))
        })?;

    let order_id = charge.metadata.get(ORDER_ID_METADATA_KEY).cloned();
    if order_id.is_none() {
        warn!(
            "[Stripe Webhook] Charge {} carries no {} metadata",
            charge.id, ORDER_ID_METADATA_KEY
        );
    }

    info!(
        "[Stripe Webhook] Charge {} succeeded for order {:?}",
        charge.id, order_id
    );

    Ok(PaymentSucceededPayload {
        stripe_payment_id: charge.id,
        order_id,
        receipt_url: charge.receipt_url,
    })
}
