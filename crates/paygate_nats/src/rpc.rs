// --- File: crates/paygate_nats/src/rpc.rs ---
//! Request/reply listener.
//!
//! One queue subscription per pattern; every message is answered from its own
//! task so a slow provider call never blocks the subscription.

use async_nats::{Client, Message};
use futures::StreamExt;
use paygate_common::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::envelope::{RpcErrorBody, RpcReply, RpcRequest};
use crate::error::NatsError;

/// Queue group shared by every replica of the service.
pub const DEFAULT_QUEUE_GROUP: &str = "payments-ms";

/// Answers the `data` of one request.
pub trait RpcHandler: Send + Sync + 'static {
    fn handle(&self, data: Value) -> BoxFuture<'_, Value, RpcErrorBody>;
}

/// Decodes a raw request, runs the handler and builds the reply.
///
/// An undecodable request is answered with a 400 error reply.
pub async fn process_request(payload: &[u8], handler: &dyn RpcHandler) -> RpcReply {
    let request: RpcRequest = match serde_json::from_slice(payload) {
        Ok(request) => request,
        Err(e) => {
            warn!("[NATS] Undecodable request: {}", e);
            return RpcReply::error(None, 400, format!("Invalid request envelope: {}", e));
        }
    };

    match handler.handle(request.data).await {
        Ok(response) => RpcReply::ok(request.id, response),
        Err(err) => RpcReply::error(request.id, err.status, err.message),
    }
}

/// Subscribes `subject` in `queue_group` and serves it until the returned task is aborted.
pub async fn serve(
    client: Client,
    subject: &str,
    queue_group: &str,
    handler: Arc<dyn RpcHandler>,
) -> Result<JoinHandle<()>, NatsError> {
    let mut subscriber = client
        .queue_subscribe(subject.to_string(), queue_group.to_string())
        .await
        .map_err(|e| NatsError::SubscribeError {
            subject: subject.to_string(),
            message: e.to_string(),
        })?;

    info!("[NATS] Listening on {} (queue group {})", subject, queue_group);

    let subject = subject.to_string();
    Ok(tokio::spawn(async move {
        while let Some(message) = subscriber.next().await {
            tokio::spawn(answer(client.clone(), message, handler.clone()));
        }
        warn!("[NATS] Subscription to {} ended", subject);
    }))
}

async fn answer(client: Client, message: Message, handler: Arc<dyn RpcHandler>) {
    let Some(reply_to) = message.reply.clone() else {
        warn!(
            "[NATS] Dropping message on {} without a reply subject",
            message.subject
        );
        return;
    };

    let reply = process_request(&message.payload, handler.as_ref()).await;
    let bytes = match serde_json::to_vec(&reply) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("[NATS] Could not encode reply for {}: {}", message.subject, e);
            return;
        }
    };

    if let Err(e) = client.publish(reply_to, bytes.into()).await {
        error!("[NATS] Could not send reply for {}: {}", message.subject, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoCurrency;

    impl RpcHandler for EchoCurrency {
        fn handle(&self, data: Value) -> BoxFuture<'_, Value, RpcErrorBody> {
            Box::pin(async move {
                match data.get("currency").and_then(Value::as_str) {
                    Some(currency) => Ok(json!({"currency": currency})),
                    None => Err(RpcErrorBody {
                        status: 400,
                        message: "currency must not be empty".to_string(),
                    }),
                }
            })
        }
    }

    #[tokio::test]
    async fn test_process_request_success_keeps_id() {
        let raw = br#"{"pattern":"create.payment.session","data":{"currency":"usd"},"id":"r1"}"#;
        let reply = process_request(raw, &EchoCurrency).await;
        assert_eq!(reply, RpcReply::ok(Some("r1".into()), json!({"currency": "usd"})));
    }

    #[tokio::test]
    async fn test_process_request_handler_error() {
        let raw = br#"{"pattern":"create.payment.session","data":{},"id":"r2"}"#;
        let reply = process_request(raw, &EchoCurrency).await;
        assert_eq!(
            reply,
            RpcReply::error(Some("r2".into()), 400, "currency must not be empty")
        );
    }

    #[tokio::test]
    async fn test_process_request_garbage() {
        let reply = process_request(b"not json", &EchoCurrency).await;
        assert!(reply.response.is_none());
        assert_eq!(reply.err.map(|e| e.status), Some(400));
        assert!(reply.is_disposed);
    }
}
