// --- File: crates/services/paygate_backend/src/lib.rs ---

pub mod app_state;
pub mod router;
pub mod rpc;

pub use app_state::AppState;
pub use router::build_router;
pub use rpc::{spawn_rpc_listener, CreatePaymentSessionRpc};
