// --- File: crates/services/paygate_backend/src/app_state.rs ---
use async_nats::Client;
use paygate_common::{create_client, PaygateError, SharedEventPublisher, DEFAULT_TIMEOUT_SECS};
use paygate_config::AppConfig;
use paygate_nats::NatsPublisher;
use paygate_stripe::{PaymentsService, SharedPaymentProvider, StripeClient};
use std::sync::Arc;
use tracing::info;

/// Everything the process builds once at startup.
///
/// The Stripe client and the NATS connection are created here and nowhere
/// else; the payments service only ever sees them through its traits.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub payments: Arc<PaymentsService>,
    /// Kept for the RPC listener and the shutdown flush.
    pub nats: Client,
}

impl AppState {
    /// Connects to the bus and wires the payments service.
    ///
    /// Fails if the bus is unreachable; the service is useless without it.
    pub async fn build(config: Arc<AppConfig>) -> Result<Self, PaygateError> {
        let http = create_client(DEFAULT_TIMEOUT_SECS, false)?;
        let provider: SharedPaymentProvider = Arc::new(StripeClient::new(http, &config.stripe));

        let nats = paygate_nats::connect(&config.nats.servers).await?;
        let publisher: SharedEventPublisher = Arc::new(NatsPublisher::new(nats.clone()));

        let payments = Arc::new(PaymentsService::new(
            provider,
            publisher,
            config.stripe.clone(),
        ));
        info!("Payments service wired (Stripe API at {})", config.stripe.api_base);

        Ok(Self {
            config,
            payments,
            nats,
        })
    }
}
