// --- File: crates/paygate_stripe/src/lib.rs ---

pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;
pub mod webhook;
#[cfg(test)]
mod webhook_test;

// Re-export for main backend
pub use client::StripeClient;
pub use error::StripeError;
pub use models::{
    PaymentSessionItem, PaymentSessionRequest, PaymentSessionResponse, PaymentSucceededPayload,
    WebhookAck, WebhookOutcome, CREATE_PAYMENT_SESSION_PATTERN, PAYMENT_SUCCEEDED_PATTERN,
};
pub use routes::routes;
pub use service::{PaymentsService, SharedPaymentProvider};
