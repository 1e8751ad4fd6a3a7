//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MintConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the configured contract address.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "LEAFMINT_CONTRACT_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// `LEAFMINT_CONTRACT_ADDRESS`, when set, overrides the file's contract
/// address.
pub fn load_config(path: &Path) -> Result<MintConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MintConfig = toml::from_str(&content)?;
    finish(config)
}

/// Build a configuration without a file: defaults plus environment.
pub fn default_config() -> Result<MintConfig, ConfigError> {
    finish(MintConfig::default())
}

fn finish(mut config: MintConfig) -> Result<MintConfig, ConfigError> {
    if let Ok(address) = std::env::var(CONTRACT_ADDRESS_ENV_VAR) {
        config.contract.address = address;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
