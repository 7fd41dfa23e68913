// --- File: crates/paygate_nats/src/error.rs ---
use paygate_common::PaygateError;
use thiserror::Error;

/// NATS-specific error types.
#[derive(Error, Debug)]
pub enum NatsError {
    /// No bus servers were configured
    #[error("No NATS servers configured")]
    NoServers,

    /// The initial connection could not be established
    #[error("Failed to connect to NATS at {servers}: {message}")]
    ConnectError { servers: String, message: String },

    /// A message could not be handed to the client's outgoing buffer
    #[error("Failed to publish on '{subject}': {message}")]
    PublishError { subject: String, message: String },

    /// Subscribing to a subject failed
    #[error("Failed to subscribe to '{subject}': {message}")]
    SubscribeError { subject: String, message: String },

    /// Flushing pending messages failed
    #[error("Failed to flush NATS client: {0}")]
    FlushError(String),

    /// An envelope could not be encoded or decoded
    #[error("Invalid message envelope: {0}")]
    EnvelopeError(#[from] serde_json::Error),
}

impl From<NatsError> for PaygateError {
    fn from(err: NatsError) -> Self {
        match err {
            NatsError::EnvelopeError(e) => PaygateError::ParseError(e.to_string()),
            other => PaygateError::MessageBusError(other.to_string()),
        }
    }
}
