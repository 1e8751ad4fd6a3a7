//! The two external seams of the mint workflow.
//!
//! The workflow controller talks to the outside world through exactly two
//! narrow interfaces: a wallet that brokers account access and chain
//! identity, and a fixed deployed contract that exposes one read and one
//! write entry point plus a mint event. Everything behind these traits is
//! an external collaborator; the controller never reaches around them.

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

use crate::blockchain::types::{BlockchainError, ChainId};

/// Flat error taxonomy at the workflow boundary.
///
/// Every variant is absorbed by the controller: logged, state reverted to
/// the nearest stable point, never fatal, never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No wallet is installed/configured.
    #[error("wallet not found")]
    WalletAbsent,

    /// The wallet holder declined the request.
    #[error("request rejected by wallet")]
    UserRejected,

    /// Connected to a chain other than the expected one.
    #[error("wrong network: connected to {0}")]
    NetworkMismatch(ChainId),

    /// Any remote call failure (transport, timeout, revert).
    #[error("remote call failed: {0}")]
    RemoteCall(String),
}

/// Result type at the gateway seams.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<BlockchainError> for GatewayError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Wallet(msg) => {
                // Wallet-backed RPC nodes surface user rejection (EIP-1193
                // code 4001) as a wallet error string.
                if msg.contains("rejected") || msg.contains("denied") {
                    GatewayError::UserRejected
                } else {
                    GatewayError::RemoteCall(msg)
                }
            }
            other => GatewayError::RemoteCall(other.to_string()),
        }
    }
}

/// A freshly observed `NewEpicNFTMinted(address, uint256)` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedEvent {
    /// Address that minted the token.
    pub minter: Address,
    /// Token id assigned by the contract.
    pub token_id: U256,
}

/// Outcome of a confirmed mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Block the transaction landed in.
    pub block_number: u64,
    /// Token id, when the mint event could be decoded from the receipt.
    pub token_id: Option<U256>,
}

/// Browser-wallet-shaped interface: account access and chain identity.
pub trait WalletGateway {
    /// Ask the wallet for account access (`eth_requestAccounts`).
    ///
    /// Succeeding means the holder approved; the first returned address
    /// is the connected account.
    fn request_accounts(&self) -> impl std::future::Future<Output = GatewayResult<Vec<Address>>>;

    /// List already-authorized accounts without prompting (`eth_accounts`).
    fn accounts(&self) -> impl std::future::Future<Output = GatewayResult<Vec<Address>>>;

    /// The chain the wallet is currently connected to (`eth_chainId`).
    fn chain_id(&self) -> impl std::future::Future<Output = GatewayResult<ChainId>>;
}

/// Interface to the fixed deployed mint contract.
pub trait ContractGateway {
    /// Read the running mint total (`getTotalMints`).
    fn total_mints(&self) -> impl std::future::Future<Output = GatewayResult<u64>>;

    /// Submit a mint transaction (`makeAnEpicNFT`) and return its hash.
    ///
    /// Returning `Ok` means the wallet approved and the transaction was
    /// broadcast; confirmation is a separate step.
    fn submit_mint(&self) -> impl std::future::Future<Output = GatewayResult<TxHash>>;

    /// Block until the transaction confirms, reverts, or the wait expires.
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl std::future::Future<Output = GatewayResult<MintReceipt>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GatewayError::WalletAbsent.to_string(), "wallet not found");
        assert_eq!(
            GatewayError::NetworkMismatch(ChainId(1)).to_string(),
            "wrong network: connected to 0x1"
        );
    }

    #[test]
    fn test_rejection_mapping() {
        let err = GatewayError::from(BlockchainError::Wallet(
            "user rejected transaction".to_string(),
        ));
        assert!(matches!(err, GatewayError::UserRejected));

        let err = GatewayError::from(BlockchainError::Rpc("boom".to_string()));
        assert!(matches!(err, GatewayError::RemoteCall(_)));
    }
}
