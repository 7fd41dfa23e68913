// --- File: crates/services/paygate_backend/src/main.rs ---
use paygate_backend::{build_router, spawn_rpc_listener, AppState};
use paygate_common::logging::{self, log_result};
use paygate_common::{config_error, internal_error, PaygateError};
use paygate_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), PaygateError> {
    logging::init();

    let config = log_result(
        load_config(),
        "Configuration loaded",
        "Failed to load configuration",
    )
    .map_err(config_error)?;
    let config = Arc::new(config);

    let state = AppState::build(config.clone()).await?;
    let rpc_task = spawn_rpc_listener(state.nats.clone(), state.payments.clone()).await?;

    let app = build_router(state.payments.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| internal_error(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Payments Microservice Running on port {}", config.server.port);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    rpc_task.abort();
    if let Err(e) = paygate_nats::flush(&state.nats).await {
        warn!("Could not flush pending bus messages: {}", e);
    }

    served.map_err(|e| internal_error(format!("HTTP server error: {}", e)))?;
    info!("Payments Microservice stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
