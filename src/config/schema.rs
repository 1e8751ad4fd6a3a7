//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so a minimal config (or none at all)
//! still loads. Only the contract address is genuinely external input;
//! the mint cap and the expected network are compile-time constants of
//! the workflow.

use serde::{Deserialize, Serialize};

/// Root configuration for the mint workflow service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MintConfig {
    /// JSON-RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Deployed contract settings.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Primary JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Deployed contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed collection contract.
    ///
    /// May also be supplied via `LEAFMINT_CONTRACT_ADDRESS`, which takes
    /// precedence over the file.
    pub address: String,

    /// Mint event polling interval in milliseconds.
    pub event_poll_interval_ms: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            event_poll_interval_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MintConfig::default();
        assert_eq!(config.rpc.rpc_url, "http://localhost:8545");
        assert_eq!(config.rpc.rpc_timeout_secs, 10);
        assert!(config.contract.address.is_empty());
        assert_eq!(config.contract.event_poll_interval_ms, 10_000);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml() {
        let config: MintConfig = toml::from_str(
            r#"
            [contract]
            address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.contract.address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        // Unspecified sections fall back to defaults
        assert_eq!(config.rpc.confirmation_blocks, 1);
    }
}
