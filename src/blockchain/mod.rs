//! Blockchain plumbing under the gateway seams.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading, wallet gateway)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (build, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the chain is unreachable

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::TxBuilder;
pub use types::{BlockchainError, ChainId, RpcConfig};
pub use wallet::{SignerWallet, Wallet};
