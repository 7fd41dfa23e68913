// --- File: crates/paygate_stripe/src/error.rs ---
use paygate_common::{external_service_error, HttpStatusCode, PaygateError};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The incoming checkout request failed validation
    #[error("{0}")]
    ValidationError(String),

    /// A price could not be expressed in minor currency units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The webhook request carried no signature header
    #[error("Missing Stripe signature.")]
    MissingSignature,

    /// Webhook signature verification failed
    #[error("{0}")]
    WebhookSignatureError(String),

    /// The signed webhook body is not a valid event
    #[error("Invalid event payload: {0}")]
    WebhookPayloadError(String),

    /// The normalized event could not be handed to the message bus
    #[error("Failed to publish event: {0}")]
    PublishError(#[source] PaygateError),
}

impl From<validator::ValidationErrors> for StripeError {
    fn from(err: validator::ValidationErrors) -> Self {
        StripeError::ValidationError(err.to_string())
    }
}

/// Convert StripeError to PaygateError
impl From<StripeError> for PaygateError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => {
                PaygateError::HttpError(format!("Stripe request error: {}", e))
            }
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                PaygateError::ParseError(format!("Stripe response parse error: {}", e))
            }
            StripeError::ValidationError(msg) => PaygateError::ValidationError(msg),
            StripeError::InvalidAmount(msg) => {
                PaygateError::ValidationError(format!("Invalid amount: {}", msg))
            }
            StripeError::MissingSignature => {
                PaygateError::ValidationError("Missing Stripe signature.".to_string())
            }
            StripeError::WebhookSignatureError(msg) => {
                PaygateError::ValidationError(format!("Webhook Error: {}", msg))
            }
            StripeError::WebhookPayloadError(msg) => {
                PaygateError::ValidationError(format!("Webhook Error: Invalid event payload: {}", msg))
            }
            StripeError::PublishError(e) => e,
        }
    }
}

/// Implement HttpStatusCode for StripeError to provide a consistent way to convert
/// StripeError to HTTP status codes.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 502,
            StripeError::ApiError { .. } => 502,
            StripeError::ParseError(_) => 502,
            StripeError::ValidationError(_) => 400,
            StripeError::InvalidAmount(_) => 400,
            StripeError::MissingSignature => 400,
            StripeError::WebhookSignatureError(_) => 400,
            StripeError::WebhookPayloadError(_) => 400,
            StripeError::PublishError(_) => 500,
        }
    }
}

impl StripeError {
    /// True for the errors a webhook caller gets back as `Webhook Error: ...`.
    pub fn is_webhook_rejection(&self) -> bool {
        matches!(
            self,
            StripeError::WebhookSignatureError(_) | StripeError::WebhookPayloadError(_)
        )
    }
}
