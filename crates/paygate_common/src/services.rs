// --- File: crates/paygate_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The payment provider and the message bus are both reached through the traits
//! below. The backend builds one concrete client of each at startup and hands
//! them to the payments service as trait objects, so tests can substitute fakes.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::PaygateError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A trait for payment provider operations.
///
/// Only hosted checkout sessions are needed; webhook verification happens
/// locally and is not part of the provider surface.
pub trait PaymentProvider: Send + Sync {
    /// Error type returned by provider operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a hosted checkout session in `payment` mode.
    fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error>;
}

/// A trait for emitting events onto the message bus.
///
/// Emission is fire-and-forget: implementations return once the message is
/// handed to the transport and never wait for a consumer.
pub trait EventPublisher: Send + Sync {
    /// Error type returned when the message could not be handed over.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Emit `payload` under the event `pattern` (e.g. `payment.succeeded`).
    fn emit(&self, pattern: &str, payload: serde_json::Value) -> BoxFuture<'_, (), Self::Error>;
}

/// Shared handle to the bus publisher used across the service.
pub type SharedEventPublisher = Arc<dyn EventPublisher<Error = PaygateError>>;

/// A single line of a checkout session, amounts already in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price in minor units (cents).
    pub unit_amount: i64,
}

/// Everything the provider needs to open a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionParams {
    /// Lowercase ISO currency code, e.g. `usd`.
    pub currency: String,
    /// Internal order id, attached as payment metadata.
    pub order_id: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// The provider's answer to a checkout session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}
