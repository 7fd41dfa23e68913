// --- File: crates/paygate_common/src/handlers.rs ---
use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Does not touch Stripe or NATS.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
