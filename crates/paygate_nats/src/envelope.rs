// --- File: crates/paygate_nats/src/envelope.rs ---
//! JSON envelopes exchanged on the bus.
//!
//! The layout matches what Nest-based services put on NATS, so Paygate can sit
//! next to them: events are `{pattern, data}`, requests add an `id`, replies
//! carry either `response` or `err` and are always marked disposed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fire-and-forget event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    pub pattern: String,
    pub data: Value,
}

impl EventEnvelope {
    pub fn new(pattern: impl Into<String>, data: Value) -> Self {
        Self {
            pattern: pattern.into(),
            data,
        }
    }
}

/// Incoming request of the request/reply surface.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RpcRequest {
    #[serde(default)]
    pub pattern: Option<Value>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub id: Option<String>,
}

/// Error half of a reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RpcErrorBody {
    pub status: u16,
    pub message: String,
}

/// Reply to an [`RpcRequest`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RpcReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<RpcErrorBody>,
    pub is_disposed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RpcReply {
    pub fn ok(id: Option<String>, response: Value) -> Self {
        Self {
            response: Some(response),
            err: None,
            is_disposed: true,
            id,
        }
    }

    pub fn error(id: Option<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            response: None,
            err: Some(RpcErrorBody {
                status,
                message: message.into(),
            }),
            is_disposed: true,
            id,
        }
    }
}
