//! Environment variable handling for the Paygate service.
//!
//! Two naming schemes are accepted. The structured one mirrors the config
//! tree (`PAYGATE__STRIPE__SUCCESS_URL`). The flat one uses the short names
//! the payments deployment has always exported (`STRIPE_SUCCESS_URL`, `PORT`,
//! `NATS_SERVERS`, ...) and wins over everything else.

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "PAYGATE";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Separator used by list-valued variables such as NATS_SERVERS
pub const LIST_SEPARATOR: &str = ",";

/// Flat variable name -> config path.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("NATS_SERVERS", "nats.servers"),
    ("STRIPE_SECRET", "stripe.secret_key"),
    ("STRIPE_ENDPOINT_SECRET", "stripe.endpoint_secret"),
    ("STRIPE_SUCCESS_URL", "stripe.success_url"),
    ("STRIPE_CANCEL_URL", "stripe.cancel_url"),
    ("STRIPE_API_BASE", "stripe.api_base"),
    ("STRIPE_WEBHOOK_TOLERANCE_SECS", "stripe.webhook_tolerance_secs"),
];

/// Config paths holding lists; their flat variables are split on [`LIST_SEPARATOR`].
pub const LIST_PATHS: &[&str] = &["nats.servers"];

/// A single override collected from the flat environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    Scalar(String),
    List(Vec<String>),
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "PAYGATE__SERVER__HOST")
pub fn config_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", DEFAULT_PREFIX, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Returns the flat variable name that feeds a config path, if there is one.
pub fn legacy_env_var_for(path: &str) -> Option<&'static str> {
    LEGACY_ENV_VARS
        .iter()
        .find(|(_, p)| *p == path)
        .map(|(name, _)| *name)
}

/// Human readable source hint for error messages, e.g. `STRIPE_SECRET (or PAYGATE__STRIPE__SECRET_KEY)`.
pub fn describe_source(path: &str) -> String {
    match legacy_env_var_for(path) {
        Some(name) => format!("{} (or {})", name, config_path_to_env_var(path)),
        None => config_path_to_env_var(path),
    }
}

/// Split a list-valued variable, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Collects the overrides coming from the flat variables.
///
/// `lookup` abstracts the environment so callers (and tests) can feed any map.
/// Empty values are ignored so an exported-but-blank variable does not mask a
/// value from a config file.
pub fn legacy_overrides<F>(lookup: F) -> Vec<(&'static str, Override)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_ENV_VARS
        .iter()
        .filter_map(|(name, path)| {
            let raw = lookup(name)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            let value = if LIST_PATHS.contains(path) {
                Override::List(split_list(raw))
            } else {
                Override::Scalar(raw.to_string())
            };
            Some((*path, value))
        })
        .collect()
}
