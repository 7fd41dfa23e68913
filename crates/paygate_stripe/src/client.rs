// --- File: crates/paygate_stripe/src/client.rs ---
use paygate_common::{BoxFuture, CheckoutSession, CheckoutSessionParams, PaymentProvider};
use paygate_config::StripeConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::StripeError;
use crate::logic::checkout_form_body;

/// Thin Stripe REST client.
///
/// Built once at startup from the loaded configuration and shared behind an
/// `Arc`; the wrapped reqwest client pools connections.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: String,
    api_base: String,
}

// Response FROM Stripe API when creating a session. Only the fields we hand back.
#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl StripeClient {
    pub fn new(http: Client, stripe_config: &StripeConfig) -> Self {
        Self {
            http,
            secret_key: stripe_config.secret_key.clone(),
            api_base: stripe_config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a Stripe Checkout Session.
    pub async fn create_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let api_url = format!("{}/v1/checkout/sessions", self.api_base);
        let form_body = checkout_form_body(params);

        info!(
            "[Stripe Logic] Creating Checkout Session for order {} ({} line items)",
            params.order_id,
            params.line_items.len()
        );

        let response = self
            .http
            .post(&api_url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        info!("[Stripe Logic] Stripe API response status: {}", status);

        if status.is_success() {
            let session: StripeCheckoutSessionApiResponse = serde_json::from_str(&body_text)?;
            info!(
                "[Stripe Logic] Checkout Session {} created for order {}",
                session.id, params.order_id
            );
            Ok(CheckoutSession {
                id: session.id,
                url: session.url,
                success_url: session.success_url,
                cancel_url: session.cancel_url,
            })
        } else {
            let message = api_error_message(&body_text);
            error!(
                "[Stripe Logic] Stripe API request failed with HTTP status: {}. Message: {}",
                status, message
            );
            Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }
}

/// Pulls `error.message` out of a Stripe error body, falling back to the raw text.
fn api_error_message(body_text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body_text)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body_text.to_string())
}

impl PaymentProvider for StripeClient {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(async move { self.create_session(&params).await })
    }
}

#[cfg(test)]
mod tests {
    use super::api_error_message;

    #[test]
    fn test_api_error_message_prefers_stripe_message() {
        let body = r#"{"error":{"message":"Invalid currency: xyz","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Invalid currency: xyz");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }
}
