// --- File: crates/paygate_nats/src/publisher.rs ---
use async_nats::Client;
use paygate_common::{BoxFuture, EventPublisher, PaygateError};
use serde_json::Value;
use tracing::{debug, error};

use crate::envelope::EventEnvelope;
use crate::error::NatsError;

/// Emits events on the subject named by their pattern.
///
/// `emit` returns once the message sits in the client's outgoing buffer.
/// Nothing waits for a subscriber and nothing is retried here.
#[derive(Clone)]
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn publish_event(&self, pattern: &str, payload: Value) -> Result<(), NatsError> {
        let bytes = encode_event(pattern, payload)?;

        self.client
            .publish(pattern.to_string(), bytes.into())
            .await
            .map_err(|e| {
                error!("[NATS] Could not publish on {}: {}", pattern, e);
                NatsError::PublishError {
                    subject: pattern.to_string(),
                    message: e.to_string(),
                }
            })?;

        debug!("[NATS] Emitted {}", pattern);
        Ok(())
    }
}

/// Serializes `payload` into the `{pattern, data}` event envelope.
pub fn encode_event(pattern: &str, payload: Value) -> Result<Vec<u8>, NatsError> {
    Ok(serde_json::to_vec(&EventEnvelope::new(pattern, payload))?)
}

impl EventPublisher for NatsPublisher {
    type Error = PaygateError;

    fn emit(&self, pattern: &str, payload: Value) -> BoxFuture<'_, (), Self::Error> {
        let pattern = pattern.to_string();
        Box::pin(async move {
            self.publish_event(&pattern, payload)
                .await
                .map_err(PaygateError::from)
        })
    }
}
