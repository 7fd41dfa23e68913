// --- File: crates/paygate_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod handlers;  // Shared HTTP handlers (health)
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod routes;    // Route definitions
pub mod services;  // Service abstractions (ports)

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, HttpStatusCode,
    PaygateError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, DEFAULT_TIMEOUT_SECS},
    map_json_error, IntoHttpResponse,
};

// Re-export service abstractions
pub use services::{
    BoxFuture, CheckoutLineItem, CheckoutSession, CheckoutSessionParams, EventPublisher,
    PaymentProvider, SharedEventPublisher,
};
