// --- File: crates/paygate_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Default Stripe REST endpoint. Overridden in tests to point at a mock server.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Stripe's SDKs reject webhook timestamps older than five minutes.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- NATS Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct NatsConfig {
    /// Server URLs, e.g. `nats://localhost:4222`. Loaded from NATS_SERVERS (comma separated).
    #[serde(default)]
    pub servers: Vec<String>,
}

// --- Stripe Config ---
// Secrets are loaded like any other value but never serialized back out.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    #[serde(skip_serializing, default)]
    pub secret_key: String, // STRIPE_SECRET
    #[serde(skip_serializing, default)]
    pub endpoint_secret: String, // STRIPE_ENDPOINT_SECRET (whsec_...)
    #[serde(default)]
    pub success_url: String, // Mandatory, checked after loading
    #[serde(default)]
    pub cancel_url: String, // Mandatory, checked after loading
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            endpoint_secret: String::new(),
            success_url: String::new(),
            cancel_url: String::new(),
            api_base: default_api_base(),
            webhook_tolerance_secs: default_webhook_tolerance(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_STRIPE_API_BASE.to_string()
}

fn default_webhook_tolerance() -> i64 {
    DEFAULT_WEBHOOK_TOLERANCE_SECS
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config always resolves thanks to the built-in defaults
    pub server: ServerConfig,

    #[serde(default)]
    pub nats: NatsConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
}
