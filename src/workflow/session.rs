//! Session state owned by the workflow controller.
//!
//! Everything here is memory-only and dies with the process, matching the
//! page-reload lifecycle of the collection site: nothing is persisted.

use alloy::primitives::{Address, TxHash, U256};

use crate::workflow::{EXPECTED_CHAIN_ID, MINT_LIMIT};

/// A wallet connection: which account, and whether it sits on the
/// expected network.
#[derive(Debug, Clone, Default)]
pub struct Session {
    connected_address: Option<Address>,
    on_expected_network: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the connected account.
    pub fn connect(&mut self, address: Address) {
        self.connected_address = Some(address);
    }

    pub fn is_connected(&self) -> bool {
        self.connected_address.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.connected_address
    }

    /// Record the outcome of the network check.
    pub fn set_on_expected_network(&mut self, on_network: bool) {
        self.on_expected_network = on_network;
    }

    pub fn on_expected_network(&self) -> bool {
        self.on_expected_network
    }
}

/// Client-side mirror of the on-chain mint total against the global cap.
///
/// The observed count is monotonically non-decreasing within a session
/// (the contract is the source of truth; a lower reading is ignored), and
/// `limit_reached` is a one-way latch: once the cap is seen, it stays
/// set for the rest of the session.
#[derive(Debug, Clone)]
pub struct MintCounter {
    observed: u64,
    limit: u64,
    limit_reached: bool,
}

impl MintCounter {
    pub fn new() -> Self {
        Self::with_limit(MINT_LIMIT)
    }

    pub fn with_limit(limit: u64) -> Self {
        Self {
            observed: 0,
            limit,
            limit_reached: false,
        }
    }

    /// Fold a freshly polled total into the counter.
    pub fn observe(&mut self, count: u64) {
        self.observed = self.observed.max(count);
        if self.observed >= self.limit {
            self.limit_reached = true;
        }
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_reached
    }
}

impl Default for MintCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Gallery link for a minted token.
///
/// Newly minted tokens can take a few minutes to appear at this URL; it
/// points at the marketplace listing, not the token data itself.
pub fn gallery_link(contract: &Address, token_id: U256) -> String {
    format!(
        "https://testnets.opensea.io/assets/{}/{}",
        contract, token_id
    )
}

/// Link to the whole collection on the marketplace.
pub fn collection_link() -> String {
    format!(
        "https://testnets.opensea.io/collection/{}",
        crate::workflow::COLLECTION_SLUG
    )
}

/// Block explorer link for a transaction.
pub fn explorer_tx_link(tx_hash: &TxHash) -> String {
    format!("https://rinkeby.etherscan.io/tx/{}", tx_hash)
}

/// True when the wallet reports the expected chain (`0x4`, Rinkeby).
pub fn is_expected_network(chain_id: crate::blockchain::types::ChainId) -> bool {
    chain_id == EXPECTED_CHAIN_ID
}
