// --- File: crates/paygate_stripe/src/models.rs ---
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Name of the header Stripe signs webhook deliveries with.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// The only webhook event type that is acted upon.
pub const CHARGE_SUCCEEDED: &str = "charge.succeeded";

/// Bus pattern the normalized payment event is emitted under.
pub const PAYMENT_SUCCEEDED_PATTERN: &str = "payment.succeeded";

/// Bus pattern of the request/reply variant of session creation.
pub const CREATE_PAYMENT_SESSION_PATTERN: &str = "create.payment.session";

/// Metadata key carrying our order id on the payment intent (and its charges).
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

// --- Checkout Session DTOs ---

/// Request to open a hosted checkout session for an order.
///
/// Unknown fields are rejected.
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentSessionRequest {
    #[validate(length(min = 1, message = "currency must not be empty"))]
    #[cfg_attr(feature = "openapi", schema(example = "usd"))]
    pub currency: String,

    #[validate(length(min = 1, message = "orderId must not be empty"))]
    #[cfg_attr(feature = "openapi", schema(example = "8f7c1d2e-7c55-4a0b-9d0e-2b1f4c3e5a61"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "items must contain at least one item"), nested)]
    pub items: Vec<PaymentSessionItem>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentSessionItem {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[cfg_attr(feature = "openapi", schema(example = "Mechanical keyboard"))]
    pub name: String,

    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub quantity: u32,

    /// Unit price in major currency units (e.g. dollars).
    #[validate(custom(function = "validate_positive_price"))]
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 9.99))]
    pub price: Decimal,
}

fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        let mut err = ValidationError::new("positive");
        err.message = Some("price must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

/// URLs handed back to the caller after a session was opened.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentSessionResponse {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1...")
    )]
    pub url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Body of the user-facing redirect endpoints.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RedirectResponse {
    pub ok: bool,
    pub message: String,
}

// --- Webhook Structures ---

/// Represents the outer Stripe Event object.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String, // e.g., "charge.succeeded"
    pub data: StripeEventData,
    #[serde(default)]
    pub livemode: bool,
}

/// Represents the `data` field within a Stripe Event.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEventData {
    /// The object the event is about. Its shape depends on the event type.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub object: serde_json::Value,
}

/// The fields of a Charge object this service reads.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeChargeObject {
    pub id: String, // ch_...
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub receipt_url: Option<String>,
}

/// Event emitted on `payment.succeeded`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceededPayload {
    pub stripe_payment_id: String,
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}

/// What happened to a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The event was normalized and emitted on the bus.
    Published(PaymentSucceededPayload),
    /// The event type is not handled; it was acknowledged and logged only.
    Ignored(String),
}

/// 200 answer to a verified webhook delivery. Echoes the signature header.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WebhookAck {
    pub sig: String,
    #[serde(skip)]
    pub outcome: WebhookOutcome,
}
