//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, gas prices parse)
//! - Check URLs before anything tries to connect
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::{GasPriceSource, WalletConfig};
use crate::connection::NetworkKind;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.connection.account_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "connection.account_poll_interval_ms",
            "must be greater than zero",
        ));
    }
    if config.connection.required_network == Some(NetworkKind::Unknown) {
        errors.push(ValidationError::new(
            "connection.required_network",
            "cannot require an unknown network",
        ));
    }

    if let Some(rpc_url) = &config.provider.rpc_url {
        check_http_url("provider.rpc_url", rpc_url, &mut errors);
    }
    if config.provider.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "provider.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    match &config.gas.source {
        GasPriceSource::Oracle { url } => check_http_url("gas.source.url", url, &mut errors),
        GasPriceSource::Fixed { wei } => check_wei("gas.source.wei", wei, &mut errors),
    }
    check_wei(
        "gas.fallback_gas_price_wei",
        &config.gas.fallback_gas_price_wei,
        &mut errors,
    );
    if config.gas.request_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "gas.request_timeout_ms",
            "must be greater than zero",
        ));
    }

    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "confirmation.poll_interval_ms",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(field: &str, raw: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}

fn check_wei(field: &str, raw: &str, errors: &mut Vec<ValidationError>) {
    match raw.parse::<u128>() {
        Ok(0) => errors.push(ValidationError::new(field, "must be greater than zero")),
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::new(
            field,
            format!("'{}' is not an integer wei amount", raw),
        )),
    }
}
