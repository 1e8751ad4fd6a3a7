//! leafmint: NFT mint workflow controller.
//!
//! Drives the mint workflow of a fixed deployed collection contract:
//! connect a wallet, verify the network, track the running mint count
//! against the global cap, submit mint transactions, and watch the chain
//! for mint events to derive gallery links.

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod gateway;
pub mod observability;
pub mod workflow;

pub use config::MintConfig;
pub use workflow::MintWorkflow;
