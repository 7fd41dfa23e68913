// --- File: crates/paygate_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Paygate errors.
///
/// Each crate keeps its own error enum and implements `From<SpecificError> for PaygateError`.
#[derive(Error, Debug)]
pub enum PaygateError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The message bus refused or dropped an outgoing message
    #[error("Message bus error: {0}")]
    MessageBusError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PaygateError {
    fn status_code(&self) -> u16 {
        match self {
            PaygateError::HttpError(_) => 502,
            PaygateError::ParseError(_) => 502,
            PaygateError::ConfigError(_) => 500,
            PaygateError::ValidationError(_) => 400,
            PaygateError::ExternalServiceError { .. } => 502,
            PaygateError::MessageBusError(_) => 500,
            PaygateError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for PaygateError {
    fn from(err: reqwest::Error) -> Self {
        PaygateError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for PaygateError {
    fn from(err: serde_json::Error) -> Self {
        PaygateError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> PaygateError {
    PaygateError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> PaygateError {
    PaygateError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> PaygateError {
    PaygateError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> PaygateError {
    PaygateError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("items must not be empty").status_code(), 400);
        assert_eq!(external_service_error("Stripe API", "boom").status_code(), 502);
        assert_eq!(PaygateError::MessageBusError("closed".into()).status_code(), 500);
        assert_eq!(config_error("missing").status_code(), 500);
    }

    #[test]
    fn test_external_service_error_message() {
        let err = external_service_error("Stripe API", "Status: 402, Message: card declined");
        assert_eq!(
            err.to_string(),
            "External service error: Stripe API - Status: 402, Message: card declined"
        );
    }
}
