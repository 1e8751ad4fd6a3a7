//! Background monitor for on-chain mint events.
//!
//! Polls `eth_getLogs` against the contract address from the last seen
//! block, staying behind the head by the confirmation depth, and delivers
//! decoded `NewEpicNFTMinted` events over a channel. This path is
//! deliberately independent of the mint call's own confirmation wait; the
//! two can race on the derived link value and the last write wins.

use std::time::Duration;

use alloy::primitives::Address;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::BlockchainError;
use crate::contract::nft::EpicNft;
use crate::gateway::MintedEvent;

/// Service that watches the contract for mint events.
pub struct MintMonitor {
    client: BlockchainClient,
    contract_address: Address,
    poll_interval: Duration,
    last_block: u64,
    events: mpsc::UnboundedSender<MintedEvent>,
}

impl MintMonitor {
    /// Create a monitor delivering events into `events`.
    pub fn new(
        client: BlockchainClient,
        contract_address: Address,
        poll_interval: Duration,
        events: mpsc::UnboundedSender<MintedEvent>,
    ) -> Self {
        Self {
            client,
            contract_address,
            poll_interval,
            last_block: 0,
            events,
        }
    }

    /// Run the monitor loop until the shutdown signal fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(contract = %self.contract_address, "Starting mint event monitor");

        // Start at the current head; only new mints are of interest
        if self.last_block == 0 {
            if let Ok(block) = self.client.get_block_number().await {
                self.last_block = block;
                tracing::info!(block = block, "Initialized mint monitor");
            }
        }

        loop {
            if let Err(e) = self.poll_events().await {
                tracing::error!(error = %e, "Error polling mint events");
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Mint event monitor stopping");
                    return;
                }
            }
        }
    }

    async fn poll_events(&mut self) -> Result<(), BlockchainError> {
        let current_block = self.client.get_block_number().await?;

        // Stay behind the head by the confirmation depth
        let target_block =
            current_block.saturating_sub(self.client.confirmation_blocks() as u64);

        if target_block <= self.last_block {
            return Ok(());
        }

        let filter = Filter::new()
            .address(self.contract_address)
            .from_block(self.last_block + 1)
            .to_block(target_block)
            .event(EpicNft::NewEpicNFTMinted::SIGNATURE);

        let logs = self.client.get_logs(&filter).await?;

        for log in logs {
            if let Ok(decoded) = log.log_decode::<EpicNft::NewEpicNFTMinted>() {
                let event = MintedEvent {
                    minter: decoded.inner.sender,
                    token_id: decoded.inner.tokenId,
                };
                tracing::info!(
                    minter = %event.minter,
                    token_id = %event.token_id,
                    "Observed mint event"
                );
                if self.events.send(event).is_err() {
                    // Receiver dropped: nobody is watching anymore
                    return Ok(());
                }
            }
        }

        self.last_block = target_block;
        Ok(())
    }
}
