//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the LCD endpoint and chain identity
//! - Validate value ranges (timeouts > 0, gas > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::DeployConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("network.lcd_url '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &DeployConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.network.lcd_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            url: config.network.lcd_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: config.network.lcd_url.clone(),
            reason: e.to_string(),
        }),
    }

    let required = [
        ("network.chain_id", &config.network.chain_id),
        ("network.account_prefix", &config.network.account_prefix),
        ("fee.denom", &config.fee.denom),
        ("wallets.deployer_mnemonic_env", &config.wallets.deployer_mnemonic_env),
        ("wallets.counterparty_mnemonic_env", &config.wallets.counterparty_mnemonic_env),
        ("artifact.name", &config.artifact.name),
        ("artifact.label", &config.artifact.label),
        ("demo.token_id", &config.demo.token_id),
        ("demo.denom", &config.demo.denom),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty(field));
        }
    }

    let positive = [
        ("network.rpc_timeout_secs", config.network.rpc_timeout_secs),
        ("network.confirmation_timeout_secs", config.network.confirmation_timeout_secs),
        ("network.poll_interval_ms", config.network.poll_interval_ms),
        ("fee.gas_limit", config.fee.gas_limit),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
