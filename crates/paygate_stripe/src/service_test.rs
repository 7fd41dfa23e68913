#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::models::{
        PaymentSessionItem, PaymentSessionRequest, WebhookOutcome, PAYMENT_SUCCEEDED_PATTERN,
    };
    use crate::service::PaymentsService;
    use crate::webhook::compute_signature;
    use chrono::Utc;
    use paygate_common::{
        BoxFuture, CheckoutSession, CheckoutSessionParams, EventPublisher, PaygateError,
        PaymentProvider,
    };
    use paygate_config::StripeConfig;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const SECRET: &str = "whsec_service_test";

    /// Records the params it was called with and answers with a fixed session.
    #[derive(Default)]
    struct FakeProvider {
        calls: Mutex<Vec<CheckoutSessionParams>>,
        fail: bool,
    }

    impl PaymentProvider for FakeProvider {
        type Error = StripeError;

        fn create_checkout_session(
            &self,
            params: CheckoutSessionParams,
        ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
            Box::pin(async move {
                let success_url = params.success_url.clone();
                let cancel_url = params.cancel_url.clone();
                self.calls.lock().unwrap().push(params);
                if self.fail {
                    return Err(StripeError::ApiError {
                        status_code: 400,
                        message: "Invalid currency: xyz".to_string(),
                    });
                }
                Ok(CheckoutSession {
                    id: "cs_test_1".to_string(),
                    url: Some("https://checkout.stripe.com/c/pay/cs_test_1".to_string()),
                    success_url: Some(success_url),
                    cancel_url: Some(cancel_url),
                })
            })
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        emitted: Mutex<Vec<(String, Value)>>,
        fail: bool,
    }

    impl EventPublisher for RecordingPublisher {
        type Error = PaygateError;

        fn emit(&self, pattern: &str, payload: Value) -> BoxFuture<'_, (), Self::Error> {
            let pattern = pattern.to_string();
            Box::pin(async move {
                if self.fail {
                    return Err(PaygateError::MessageBusError("connection closed".to_string()));
                }
                self.emitted.lock().unwrap().push((pattern, payload));
                Ok(())
            })
        }
    }

    fn stripe_config() -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test_123".to_string(),
            endpoint_secret: SECRET.to_string(),
            success_url: "http://localhost:3003/payments/success".to_string(),
            cancel_url: "http://localhost:3003/payments/cancel".to_string(),
            ..StripeConfig::default()
        }
    }

    fn service_with(
        provider: Arc<FakeProvider>,
        publisher: Arc<RecordingPublisher>,
    ) -> PaymentsService {
        PaymentsService::new(provider, publisher, stripe_config())
    }

    fn order() -> PaymentSessionRequest {
        PaymentSessionRequest {
            currency: "usd".to_string(),
            order_id: "order-1".to_string(),
            items: vec![PaymentSessionItem {
                name: "A".to_string(),
                quantity: 2,
                price: Decimal::new(9995, 3),
            }],
        }
    }

    fn signed(body: &Value) -> (Vec<u8>, String) {
        let bytes = serde_json::to_vec(body).unwrap();
        let ts = Utc::now().timestamp().to_string();
        let sig = compute_signature(&bytes, &ts, SECRET).unwrap();
        (bytes, format!("t={},v1={}", ts, sig))
    }

    fn charge_event() -> Value {
        json!({
            "id": "evt_charge",
            "type": "charge.succeeded",
            "data": {"object": {
                "id": "ch_123",
                "object": "charge",
                "metadata": {"orderId": "order-1"},
                "receipt_url": "https://pay.stripe.com/receipts/ch_123"
            }}
        })
    }

    #[tokio::test]
    async fn test_create_payment_session_returns_provider_urls() {
        let provider = Arc::new(FakeProvider::default());
        let service = service_with(provider.clone(), Arc::new(RecordingPublisher::default()));

        let response = service.create_payment_session(order()).await.unwrap();

        assert_eq!(
            response.url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_1")
        );
        assert_eq!(
            response.success_url.as_deref(),
            Some("http://localhost:3003/payments/success")
        );
        assert_eq!(
            response.cancel_url.as_deref(),
            Some("http://localhost:3003/payments/cancel")
        );

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].order_id, "order-1");
        assert_eq!(calls[0].line_items[0].unit_amount, 1000);
        assert_eq!(calls[0].line_items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_invalid_order_never_reaches_provider() {
        let provider = Arc::new(FakeProvider::default());
        let service = service_with(provider.clone(), Arc::new(RecordingPublisher::default()));

        let mut empty_items = order();
        empty_items.items.clear();
        let mut zero_quantity = order();
        zero_quantity.items[0].quantity = 0;
        let mut negative_price = order();
        negative_price.items[0].price = Decimal::new(-1, 0);
        let mut blank_currency = order();
        blank_currency.currency = String::new();

        for request in [empty_items, zero_quantity, negative_price, blank_currency] {
            let err = service.create_payment_session(request).await.unwrap_err();
            assert!(matches!(err, StripeError::ValidationError(_)), "got {:?}", err);
        }
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let provider = Arc::new(FakeProvider {
            fail: true,
            ..FakeProvider::default()
        });
        let service = service_with(provider, Arc::new(RecordingPublisher::default()));

        let err = service.create_payment_session(order()).await.unwrap_err();
        assert!(matches!(err, StripeError::ApiError { status_code: 400, .. }));
    }

    #[tokio::test]
    async fn test_charge_succeeded_publishes_exactly_once() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service_with(Arc::new(FakeProvider::default()), publisher.clone());
        let (body, header) = signed(&charge_event());

        let ack = service.handle_webhook(&body, Some(&header)).await.unwrap();

        assert_eq!(ack.sig, header);
        assert!(matches!(ack.outcome, WebhookOutcome::Published(_)));

        let emitted = publisher.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, PAYMENT_SUCCEEDED_PATTERN);
        assert_eq!(
            emitted[0].1,
            json!({
                "stripePaymentId": "ch_123",
                "orderId": "order-1",
                "receiptUrl": "https://pay.stripe.com/receipts/ch_123"
            })
        );
    }

    #[tokio::test]
    async fn test_other_event_types_are_acknowledged_without_publishing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service_with(Arc::new(FakeProvider::default()), publisher.clone());
        let (body, header) = signed(&json!({
            "id": "evt_pi",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_1"}}
        }));

        let ack = service.handle_webhook(&body, Some(&header)).await.unwrap();

        assert_eq!(
            ack.outcome,
            WebhookOutcome::Ignored("payment_intent.succeeded".to_string())
        );
        assert!(publisher.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_or_empty_signature() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service_with(Arc::new(FakeProvider::default()), publisher.clone());
        let (body, _) = signed(&charge_event());

        for sig in [None, Some("")] {
            let err = service.handle_webhook(&body, sig).await.unwrap_err();
            assert!(matches!(err, StripeError::MissingSignature));
        }
        assert!(publisher.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_signature_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service_with(Arc::new(FakeProvider::default()), publisher.clone());
        let (body, _) = signed(&charge_event());
        let header = format!("t={},v1={}", Utc::now().timestamp(), "ab".repeat(32));

        let err = service.handle_webhook(&body, Some(&header)).await.unwrap_err();

        assert!(err.is_webhook_rejection());
        assert!(publisher.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_surfaced() {
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..RecordingPublisher::default()
        });
        let service = service_with(Arc::new(FakeProvider::default()), publisher);
        let (body, header) = signed(&charge_event());

        let err = service.handle_webhook(&body, Some(&header)).await.unwrap_err();

        assert!(matches!(err, StripeError::PublishError(_)));
        assert_eq!(PaygateError::from(err).to_string(), "Message bus error: connection closed");
    }
}
