use config::{Config, ConfigError, Environment, File, Map};
use once_cell::sync::OnceCell;
use std::env;
use tracing::{debug, info};

pub mod env_vars;
pub mod models;

pub use models::*;

use env_vars::{Override, CONFIG_SEPARATOR, DEFAULT_PREFIX, LIST_SEPARATOR};

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file defaults to `.env`; `DOTENV_OVERRIDE` points at another one.
/// Loading happens at most once per process. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

/// Loads the configuration from the process environment (after `.env`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let dotenv_path = ensure_dotenv_loaded();
    debug!("dotenv source: {}", dotenv_path);
    load_config_from_env(env::vars().collect())
}

/// Loads the configuration from an explicit variable map.
///
/// Layering, lowest priority first: built-in defaults, `config/default.*`,
/// `config/<RUN_ENV>.*`, `PAYGATE__*` variables, flat variables (`PORT`,
/// `STRIPE_SECRET`, ...).
pub fn load_config_from_env(vars: Map<String, String>) -> Result<AppConfig, ConfigError> {
    let run_env = vars
        .get("RUN_ENV")
        .cloned()
        .unwrap_or_else(|| "debug".to_string());

    let overrides = env_vars::legacy_overrides(|key| vars.get(key).cloned());

    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3003_i64)?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(
            Environment::with_prefix(DEFAULT_PREFIX)
                .prefix_separator(CONFIG_SEPARATOR)
                .separator(CONFIG_SEPARATOR)
                .list_separator(LIST_SEPARATOR)
                .with_list_parse_key("nats.servers")
                .try_parsing(true)
                .source(Some(vars)),
        );

    for (path, value) in overrides {
        builder = match value {
            Override::Scalar(v) => builder.set_override(path, v)?,
            Override::List(v) => builder.set_override(path, v)?,
        };
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;
    validate(&config)?;

    info!(
        "Configuration loaded (run_env={}, port={}, nats servers={})",
        run_env,
        config.server.port,
        config.nats.servers.len()
    );
    Ok(config)
}

/// Rejects configurations missing a mandatory value, naming the variable to set.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let required = [
        ("nats.servers", config.nats.servers.is_empty()),
        ("stripe.secret_key", config.stripe.secret_key.is_empty()),
        ("stripe.endpoint_secret", config.stripe.endpoint_secret.is_empty()),
        ("stripe.success_url", config.stripe.success_url.is_empty()),
        ("stripe.cancel_url", config.stripe.cancel_url.is_empty()),
    ];

    let missing: Vec<String> = required
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(path, _)| env_vars::describe_source(path))
        .collect();

    if !missing.is_empty() {
        return Err(ConfigError::Message(format!(
            "missing required configuration: {}",
            missing.join(", ")
        )));
    }

    if config.stripe.webhook_tolerance_secs <= 0 {
        return Err(ConfigError::Message(
            "stripe.webhook_tolerance_secs must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> Map<String, String> {
        [
            ("PORT", "4010"),
            ("NATS_SERVERS", "nats://localhost:4222,nats://localhost:4223"),
            ("STRIPE_SECRET", "sk_test_123"),
            ("STRIPE_ENDPOINT_SECRET", "whsec_abc"),
            ("STRIPE_SUCCESS_URL", "http://localhost:3003/payments/success"),
            ("STRIPE_CANCEL_URL", "http://localhost:3003/payments/cancel"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_load_from_flat_variables() {
        let config = load_config_from_env(full_env()).expect("config should load");

        assert_eq!(config.server.port, 4010);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.nats.servers,
            vec!["nats://localhost:4222", "nats://localhost:4223"]
        );
        assert_eq!(config.stripe.secret_key, "sk_test_123");
        assert_eq!(config.stripe.endpoint_secret, "whsec_abc");
        assert_eq!(config.stripe.api_base, DEFAULT_STRIPE_API_BASE);
        assert_eq!(
            config.stripe.webhook_tolerance_secs,
            DEFAULT_WEBHOOK_TOLERANCE_SECS
        );
    }

    #[test]
    fn test_flat_variables_win_over_prefixed() {
        let mut env = full_env();
        env.insert("PAYGATE__SERVER__PORT".to_string(), "5000".to_string());
        env.insert("PAYGATE__SERVER__HOST".to_string(), "127.0.0.1".to_string());

        let config = load_config_from_env(env).expect("config should load");

        assert_eq!(config.server.port, 4010);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_secrets_are_reported_by_name() {
        let mut env = full_env();
        env.remove("STRIPE_SECRET");
        env.remove("STRIPE_ENDPOINT_SECRET");

        let err = load_config_from_env(env).unwrap_err().to_string();

        assert!(err.contains("STRIPE_SECRET"), "unexpected error: {}", err);
        assert!(err.contains("STRIPE_ENDPOINT_SECRET"), "unexpected error: {}", err);
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let config = load_config_from_env(full_env()).expect("config should load");
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("sk_test_123"));
        assert!(!json.contains("whsec_abc"));
        assert!(json.contains("success_url"));
    }
}
