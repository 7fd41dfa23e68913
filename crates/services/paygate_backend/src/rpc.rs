// --- File: crates/services/paygate_backend/src/rpc.rs ---
//! Bus-side twin of `POST /payments/create-payment-session`.

use async_nats::Client;
use paygate_common::{BoxFuture, HttpStatusCode};
use paygate_nats::{NatsError, RpcErrorBody, RpcHandler, DEFAULT_QUEUE_GROUP};
use paygate_stripe::{PaymentSessionRequest, PaymentsService, CREATE_PAYMENT_SESSION_PATTERN};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Answers `create.payment.session` with the same rules as the HTTP route.
pub struct CreatePaymentSessionRpc {
    service: Arc<PaymentsService>,
}

impl CreatePaymentSessionRpc {
    pub fn new(service: Arc<PaymentsService>) -> Self {
        Self { service }
    }
}

impl RpcHandler for CreatePaymentSessionRpc {
    fn handle(&self, data: Value) -> BoxFuture<'_, Value, RpcErrorBody> {
        Box::pin(async move {
            let request: PaymentSessionRequest =
                serde_json::from_value(data).map_err(|e| RpcErrorBody {
                    status: 400,
                    message: e.to_string(),
                })?;

            let response = self
                .service
                .create_payment_session(request)
                .await
                .map_err(|e| {
                    warn!("[RPC] {} failed: {}", CREATE_PAYMENT_SESSION_PATTERN, e);
                    RpcErrorBody {
                        status: e.status_code(),
                        message: e.to_string(),
                    }
                })?;

            serde_json::to_value(response).map_err(|e| RpcErrorBody {
                status: 500,
                message: e.to_string(),
            })
        })
    }
}

/// Starts the `create.payment.session` listener in the shared queue group.
pub async fn spawn_rpc_listener(
    client: Client,
    service: Arc<PaymentsService>,
) -> Result<JoinHandle<()>, NatsError> {
    paygate_nats::serve(
        client,
        CREATE_PAYMENT_SESSION_PATTERN,
        DEFAULT_QUEUE_GROUP,
        Arc::new(CreatePaymentSessionRpc::new(service)),
    )
    .await
}
