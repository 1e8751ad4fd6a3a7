//! Alloy-backed gateway to the deployed mint contract.

use std::sync::Arc;

use alloy::consensus::TxReceipt;
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::BlockchainError;
use crate::blockchain::wallet::Wallet;
use crate::gateway::{ContractGateway, GatewayError, GatewayResult, MintReceipt};
use crate::observability::metrics;

sol! {
    /// ABI surface of the deployed collection contract.
    #[derive(Debug)]
    interface EpicNft {
        function getTotalMints() external view returns (uint256);
        function makeAnEpicNFT() external;
        event NewEpicNFTMinted(address indexed sender, uint256 tokenId);
    }
}

/// How long to wait for a submitted mint to confirm, in seconds.
const CONFIRMATION_WAIT_SECS: u64 = 300;

/// Production [`ContractGateway`] over the JSON-RPC client.
///
/// Reads go through the failover client; writes go through a separate
/// wallet-signing provider built from the local key. Without a wallet the
/// gateway is read-only and `submit_mint` reports the wallet as absent.
pub struct NftContract {
    client: BlockchainClient,
    address: Address,
    /// Write path, present only when a wallet is installed.
    writer: Option<Writer>,
}

struct Writer {
    /// Signing provider for broadcasting transactions.
    sender: Arc<dyn Provider + Send + Sync>,
    /// Shapes nonce and gas for outgoing calls.
    tx: TxBuilder,
}

impl NftContract {
    /// Create a gateway for the contract at `address`.
    pub fn new(
        client: BlockchainClient,
        address: Address,
        wallet: Option<Wallet>,
    ) -> Result<Self, BlockchainError> {
        let writer = match wallet {
            Some(wallet) => {
                let url: url::Url = client.config().rpc_url.parse().map_err(|e| {
                    BlockchainError::Rpc(format!("Invalid RPC URL: {}", e))
                })?;
                let signer = EthereumWallet::from(wallet.signer().clone());
                let sender = Arc::new(ProviderBuilder::new().wallet(signer).connect_http(url))
                    as Arc<dyn Provider + Send + Sync>;
                Some(Writer {
                    sender,
                    tx: TxBuilder::new(client.clone(), wallet),
                })
            }
            None => None,
        };

        tracing::info!(
            contract = %address,
            writable = writer.is_some(),
            "Contract gateway initialized"
        );

        Ok(Self {
            client,
            address,
            writer,
        })
    }

    /// The deployed contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn decode_minted_token(logs: &[Log]) -> Option<U256> {
        logs.iter().find_map(|log| {
            log.log_decode::<EpicNft::NewEpicNFTMinted>()
                .ok()
                .map(|decoded| decoded.inner.tokenId)
        })
    }
}

impl ContractGateway for NftContract {
    async fn total_mints(&self) -> GatewayResult<u64> {
        let data = EpicNft::getTotalMintsCall {}.abi_encode();
        let ret = self.client.call(self.address, data.into()).await?;
        let total = EpicNft::getTotalMintsCall::abi_decode_returns(&ret)
            .map_err(|e| GatewayError::RemoteCall(format!("Bad getTotalMints return: {}", e)))?;
        Ok(total.saturating_to::<u64>())
    }

    async fn submit_mint(&self) -> GatewayResult<TxHash> {
        let writer = self.writer.as_ref().ok_or(GatewayError::WalletAbsent)?;

        let data = EpicNft::makeAnEpicNFTCall {}.abi_encode();
        let request = writer.tx.build_call(self.address, data.into()).await?;

        let pending = writer.sender.send_transaction(request).await.map_err(|e| {
            if is_user_rejection(&e) {
                GatewayError::UserRejected
            } else {
                GatewayError::RemoteCall(format!("Broadcast failed: {}", e))
            }
        })?;

        let tx_hash = *pending.tx_hash();
        metrics::record_mint_submitted();
        tracing::info!(tx_hash = %tx_hash, "Mint transaction submitted");
        Ok(tx_hash)
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> GatewayResult<MintReceipt> {
        let writer = self.writer.as_ref().ok_or(GatewayError::WalletAbsent)?;

        let receipt = writer
            .tx
            .wait_for_confirmation(tx_hash, CONFIRMATION_WAIT_SECS)
            .await?;

        let block_number = receipt.block_number.unwrap_or_default();
        let token_id = Self::decode_minted_token(receipt.inner.logs());

        Ok(MintReceipt {
            tx_hash,
            block_number,
            token_id,
        })
    }
}

/// EIP-1193 wallets reject declined prompts with error code 4001.
fn is_user_rejection<E: std::fmt::Display>(err: &E) -> bool {
    let msg = err.to_string();
    msg.contains("4001") || msg.contains("rejected") || msg.contains("denied")
}
