// --- File: crates/paygate_stripe/src/routes.rs ---

use crate::handlers::{
    create_payment_session_handler, payment_cancel_handler, payment_success_handler,
    stripe_webhook_handler,
};
use crate::service::PaymentsService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the payments feature.
pub fn routes(service: Arc<PaymentsService>) -> Router {
    Router::new()
        .route(
            "/payments/create-payment-session",
            post(create_payment_session_handler),
        )
        .route("/payments/webhook", post(stripe_webhook_handler))
        // User-facing redirect endpoints (GET)
        .route("/payments/success", get(payment_success_handler))
        .route("/payments/cancel", get(payment_cancel_handler))
        .with_state(service)
}
