//! Wallet management and the wallet-gateway seam.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::gateway::{GatewayError, GatewayResult, WalletGateway};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "LEAFMINT_PRIVATE_KEY";

/// Wallet for transaction signing with nonce management.
#[derive(Debug)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Current nonce for sequential transactions.
    nonce: Arc<AtomicU64>,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self {
            signer,
            nonce: Arc::new(AtomicU64::new(0)),
            chain_id,
        })
    }

    /// Load wallet from the `LEAFMINT_PRIVATE_KEY` environment variable.
    ///
    /// Returns `None` when the variable is unset: this is the "no wallet
    /// installed" case, not an error.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Option<Self>> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(private_key) => Self::from_private_key(&private_key, chain_id).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the underlying signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Set the nonce to a specific value (e.g., after querying from chain).
    pub fn set_nonce(&self, nonce: u64) {
        self.nonce.store(nonce, Ordering::SeqCst);
    }

    /// Get and increment the nonce atomically.
    pub fn get_and_increment_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// Get current nonce without incrementing.
    pub fn current_nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            nonce: self.nonce.clone(),
            chain_id: self.chain_id,
        }
    }
}

/// Production [`WalletGateway`]: a locally held signer plus the RPC client.
///
/// The browser-wallet operations map onto it directly: account access is
/// granted by the presence of the key, and `eth_chainId` is read from the
/// node. A missing key plays the role of the missing wallet extension.
pub struct SignerWallet {
    client: BlockchainClient,
    inner: Option<Wallet>,
}

impl SignerWallet {
    /// Build the gateway, picking the signer up from the environment.
    ///
    /// A malformed key is logged and treated the same as an absent one.
    pub fn from_env(client: BlockchainClient, chain_id: u64) -> Self {
        let inner = match Wallet::from_env(chain_id) {
            Ok(wallet) => wallet,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unusable wallet key");
                None
            }
        };
        Self { client, inner }
    }

    /// Build the gateway around an existing wallet.
    pub fn with_wallet(client: BlockchainClient, wallet: Wallet) -> Self {
        Self {
            client,
            inner: Some(wallet),
        }
    }

    /// The signing wallet, if one is installed.
    pub fn signer(&self) -> Option<&Wallet> {
        self.inner.as_ref()
    }
}

impl WalletGateway for SignerWallet {
    async fn request_accounts(&self) -> GatewayResult<Vec<Address>> {
        match &self.inner {
            Some(wallet) => Ok(vec![wallet.address()]),
            None => Err(GatewayError::WalletAbsent),
        }
    }

    async fn accounts(&self) -> GatewayResult<Vec<Address>> {
        match &self.inner {
            Some(wallet) => Ok(vec![wallet.address()]),
            None => Err(GatewayError::WalletAbsent),
        }
    }

    async fn chain_id(&self) -> GatewayResult<ChainId> {
        if self.inner.is_none() {
            return Err(GatewayError::WalletAbsent);
        }
        self.client.get_chain_id().await.map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::RpcConfig;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_client() -> BlockchainClient {
        BlockchainClient::new(RpcConfig::default()).unwrap()
    }

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 4).unwrap();
        // This is the corresponding address for the test key
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.chain_id(), 4);
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), 4).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key", 4);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid private key"));
    }

    #[test]
    fn test_nonce_management() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 4).unwrap();

        assert_eq!(wallet.current_nonce(), 0);
        assert_eq!(wallet.get_and_increment_nonce(), 0);
        assert_eq!(wallet.get_and_increment_nonce(), 1);
        assert_eq!(wallet.current_nonce(), 2);

        wallet.set_nonce(100);
        assert_eq!(wallet.current_nonce(), 100);
    }

    #[tokio::test]
    async fn test_absent_wallet_reports_wallet_absent() {
        let gateway = SignerWallet {
            client: test_client(),
            inner: None,
        };
        assert!(matches!(
            gateway.request_accounts().await,
            Err(GatewayError::WalletAbsent)
        ));
        assert!(matches!(
            gateway.chain_id().await,
            Err(GatewayError::WalletAbsent)
        ));
    }

    #[tokio::test]
    async fn test_present_wallet_returns_single_account() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 4).unwrap();
        let address = wallet.address();
        let gateway = SignerWallet::with_wallet(test_client(), wallet);

        let accounts = gateway.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![address]);
        assert_eq!(gateway.accounts().await.unwrap(), vec![address]);
    }
}
