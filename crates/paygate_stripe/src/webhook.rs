// --- File: crates/paygate_stripe/src/webhook.rs ---
//! Local re-implementation of Stripe's `constructEvent`.
//!
//! Header format: `t=<unix seconds>,v1=<hex hmac>[,v1=...][,v0=...]`.
//! The signed payload is `"<t>.<raw body>"`, HMAC-SHA256 keyed by the
//! endpoint secret (`whsec_...`).

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::StripeError;
use crate::models::StripeEvent;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme Stripe uses for live and test mode deliveries.
const EXPECTED_SCHEME: &str = "v1";

pub const ERR_HEADER_FORMAT: &str = "Unable to extract timestamp and signatures from header";
pub const ERR_NO_MATCH: &str = "No signatures found matching the expected signature for payload. \
Are you passing the raw request body you received from Stripe?";
pub const ERR_NO_SCHEME: &str = "No signatures found with expected scheme";
pub const ERR_TOLERANCE: &str = "Timestamp outside the tolerance zone";

/// Parsed `Stripe-Signature` header.
#[derive(Debug, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// Raw timestamp text, signed verbatim.
    pub timestamp_raw: &'a str,
    pub timestamp: i64,
    pub signatures: Vec<&'a str>,
}

/// Splits the header into its timestamp and `v1` signatures.
///
/// A header with a timestamp but no `v1` entry (e.g. only `v0`) fails with
/// [`ERR_NO_SCHEME`]; anything without a usable timestamp with [`ERR_HEADER_FORMAT`].
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader<'_>, StripeError> {
    let mut timestamp_raw: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for item in header.split(',') {
        let Some((key, value)) = item.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp_raw = Some(value),
            EXPECTED_SCHEME => signatures.push(value),
            _ => {} // v0 and future schemes are ignored
        }
    }

    let timestamp_raw =
        timestamp_raw.ok_or_else(|| StripeError::WebhookSignatureError(ERR_HEADER_FORMAT.into()))?;
    let timestamp = timestamp_raw
        .parse::<i64>()
        .map_err(|_| StripeError::WebhookSignatureError(ERR_HEADER_FORMAT.into()))?;

    if signatures.is_empty() {
        return Err(StripeError::WebhookSignatureError(ERR_NO_SCHEME.into()));
    }

    Ok(SignatureHeader {
        timestamp_raw,
        timestamp,
        signatures,
    })
}

/// Hex HMAC over `"<timestamp>.<payload>"`.
pub fn compute_signature(payload: &[u8], timestamp: &str, secret: &str) -> Result<String, StripeError> {
    let mac = signed_payload_mac(payload, timestamp, secret)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signed_payload_mac(payload: &[u8], timestamp: &str, secret: &str) -> Result<HmacSha256, StripeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verifies the header against the raw payload at time `now` (unix seconds).
///
/// Signatures are checked first, then the timestamp age. A timestamp in the
/// future is accepted, as Stripe's SDKs do.
pub fn verify_signature_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), StripeError> {
    let parsed = parse_signature_header(header)?;
    let mac = signed_payload_mac(payload, parsed.timestamp_raw, secret)?;

    // Comparison goes through `verify_slice`, which is constant time.
    let matched = parsed
        .signatures
        .iter()
        .filter_map(|sig| hex::decode(sig).ok())
        .any(|sig| mac.clone().verify_slice(&sig).is_ok());

    if !matched {
        warn!("[Stripe Webhook] Signature mismatch for timestamp {}", parsed.timestamp);
        return Err(StripeError::WebhookSignatureError(ERR_NO_MATCH.into()));
    }

    // `t` is attacker controlled; an unrepresentable age is outside any window.
    let age = now.checked_sub(parsed.timestamp).unwrap_or(i64::MAX);
    if tolerance_secs > 0 && age > tolerance_secs {
        warn!(
            "[Stripe Webhook] Timestamp outside tolerance. Now: {}, Event: {}, Age: {}s",
            now, parsed.timestamp, age
        );
        return Err(StripeError::WebhookSignatureError(ERR_TOLERANCE.into()));
    }

    debug!("[Stripe Webhook] Signature verified (age {}s)", age);
    Ok(())
}

/// Verifies the delivery against the wall clock.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<(), StripeError> {
    verify_signature_at(payload, header, secret, tolerance_secs, Utc::now().timestamp())
}

/// Verifies the signature and only then parses the body into an event.
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<StripeEvent, StripeError> {
    verify_signature(payload, header, secret, tolerance_secs)?;
    serde_json::from_slice(payload).map_err(|e| StripeError::WebhookPayloadError(e.to_string()))
}
