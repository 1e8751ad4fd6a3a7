//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Validation is
//! a pure function over the config and returns all errors, not just the
//! first.

use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::MintConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &MintConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rpc.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "rpc.rpc_url".to_string(),
            message: format!("'{}' is not a valid URL", config.rpc.rpc_url),
        });
    }
    for (i, url) in config.rpc.failover_urls.iter().enumerate() {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: format!("rpc.failover_urls[{}]", i),
                message: format!("'{}' is not a valid URL", url),
            });
        }
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "rpc.rpc_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if config.rpc.gas_price_multiplier <= 0.0 {
        errors.push(ValidationError {
            field: "rpc.gas_price_multiplier".to_string(),
            message: "must be positive".to_string(),
        });
    }

    if !config.contract.address.is_empty() && config.contract.address.parse::<Address>().is_err() {
        errors.push(ValidationError {
            field: "contract.address".to_string(),
            message: format!("'{}' is not a valid address", config.contract.address),
        });
    }
    if config.contract.event_poll_interval_ms == 0 {
        errors.push(ValidationError {
            field: "contract.event_poll_interval_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MintConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MintConfig::default();
        config.rpc.rpc_url = "nope".to_string();
        config.rpc.rpc_timeout_secs = 0;
        config.contract.address = "0x123".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"rpc.rpc_url"));
        assert!(fields.contains(&"rpc.rpc_timeout_secs"));
        assert!(fields.contains(&"contract.address"));
    }

    #[test]
    fn test_empty_contract_address_is_allowed() {
        // Missing address is a startup concern, not a config parse error
        let config = MintConfig::default();
        assert!(config.contract.address.is_empty());
        assert!(validate_config(&config).is_ok());
    }
}
