// --- File: crates/paygate_nats/src/lib.rs ---

pub mod envelope;
pub mod error;
pub mod publisher;
pub mod rpc;

use async_nats::{Client, ConnectOptions, ServerAddr};
use tracing::info;

pub use envelope::{EventEnvelope, RpcErrorBody, RpcReply, RpcRequest};
pub use error::NatsError;
pub use publisher::NatsPublisher;
pub use rpc::{serve, RpcHandler, DEFAULT_QUEUE_GROUP};

/// Name the connection reports to the server.
const CLIENT_NAME: &str = "paygate";

/// Connects once to the configured servers.
pub async fn connect(servers: &[String]) -> Result<Client, NatsError> {
    if servers.is_empty() {
        return Err(NatsError::NoServers);
    }
    let joined = servers.join(",");

    let addrs = servers
        .iter()
        .map(|s| s.trim().parse::<ServerAddr>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| NatsError::ConnectError {
            servers: joined.clone(),
            message: e.to_string(),
        })?;

    let client = ConnectOptions::new()
        .name(CLIENT_NAME)
        .connect(&addrs[..])
        .await
        .map_err(|e| NatsError::ConnectError {
            servers: joined.clone(),
            message: e.to_string(),
        })?;

    info!("[NATS] Connected to {}", joined);
    Ok(client)
}

/// Pushes out anything still buffered. Called on shutdown.
pub async fn flush(client: &Client) -> Result<(), NatsError> {
    client
        .flush()
        .await
        .map_err(|e| NatsError::FlushError(e.to_string()))
}
