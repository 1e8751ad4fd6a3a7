//! The mint workflow controller.
//!
//! One controller instance owns the whole session: connection, network
//! flag, mint counter, phase, and the derived gallery link. It exposes
//! four remote sequences (connect, network check, count refresh, mint)
//! plus the decoupled event observation.
//!
//! Failure semantics: every gateway error is absorbed here. Operations
//! log the failure, fall back to the nearest stable state, and never
//! retry; nothing propagates past the controller boundary.

use alloy::primitives::Address;
use serde::Serialize;

use crate::gateway::{ContractGateway, GatewayError, MintedEvent, WalletGateway};
use crate::observability::metrics;
use crate::workflow::session::{
    explorer_tx_link, gallery_link, is_expected_network, MintCounter, Session,
};

/// Where the workflow currently sits within a mint attempt.
///
/// `Idle → AwaitingApproval → Mining → Idle`; any failure along the way
/// drops straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MintPhase {
    /// No mint in flight.
    Idle,
    /// Waiting for the wallet holder to approve and pay gas.
    AwaitingApproval,
    /// Transaction broadcast, waiting for confirmation.
    Mining,
}

/// Read-only view of the workflow for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub connected_address: Option<String>,
    pub on_expected_network: bool,
    pub observed_mints: u64,
    pub mint_limit: u64,
    pub limit_reached: bool,
    pub phase: MintPhase,
    pub nft_link: Option<String>,
    pub collection_link: String,
}

/// Controller sequencing the mint workflow over the two gateways.
pub struct MintWorkflow<W, C> {
    wallet: W,
    contract: C,
    contract_address: Address,
    session: Session,
    counter: MintCounter,
    phase: MintPhase,
    /// Derived gallery link; written by both the confirmation path and
    /// the event path, last write wins.
    nft_link: Option<String>,
}

impl<W: WalletGateway, C: ContractGateway> MintWorkflow<W, C> {
    /// Create a controller with a fresh session.
    pub fn new(wallet: W, contract: C, contract_address: Address) -> Self {
        Self {
            wallet,
            contract,
            contract_address,
            session: Session::new(),
            counter: MintCounter::new(),
            phase: MintPhase::Idle,
            nft_link: None,
        }
    }

    /// Ask the wallet for account access and record the first account.
    ///
    /// With no wallet installed this reports the condition and takes no
    /// further action; a declined prompt leaves the session disconnected.
    pub async fn connect(&mut self) {
        match self.wallet.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(address) => {
                    tracing::info!(address = %address, "Wallet connected");
                    self.session.connect(*address);
                }
                None => {
                    tracing::warn!("Wallet returned no accounts");
                }
            },
            Err(GatewayError::WalletAbsent) => {
                tracing::warn!("No wallet found; install one to mint");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wallet connection failed");
            }
        }
    }

    /// Adopt an already-authorized account without prompting, if any.
    ///
    /// Startup path, meant to run before the first explicit connect:
    /// silent on an absent wallet, silent on an empty account list.
    pub async fn resume(&mut self) {
        match self.wallet.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(address) => {
                    tracing::info!(address = %address, "Found an authorized account");
                    self.session.connect(*address);
                }
                None => {
                    tracing::debug!("No authorized account found");
                }
            },
            Err(GatewayError::WalletAbsent) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Account lookup failed");
            }
        }
    }

    /// Compare the wallet's chain against the expected network.
    ///
    /// Evaluated once per connection; there is no polling. Any error
    /// reading the chain id counts as the wrong network.
    pub async fn check_network(&mut self) {
        if !self.session.is_connected() {
            return;
        }

        match self.wallet.chain_id().await {
            Ok(chain_id) => {
                let on_network = is_expected_network(chain_id);
                tracing::info!(chain_id = %chain_id, on_network, "Connected to chain");
                self.session.set_on_expected_network(on_network);
                if !on_network {
                    tracing::warn!(
                        chain_id = %chain_id,
                        expected = %crate::workflow::EXPECTED_CHAIN_ID,
                        "Wrong network; minting is disabled"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Network check failed");
                self.session.set_on_expected_network(false);
            }
        }
    }

    /// Poll the contract for the running mint total.
    ///
    /// Requires a connected session on the expected network. Crossing the
    /// cap latches the limit for the rest of the session.
    pub async fn refresh_mint_count(&mut self) {
        if !self.session.is_connected() || !self.session.on_expected_network() {
            return;
        }

        match self.contract.total_mints().await {
            Ok(count) => {
                self.counter.observe(count);
                metrics::record_mint_count(self.counter.observed());
                tracing::info!(
                    observed = self.counter.observed(),
                    limit = self.counter.limit(),
                    "Refreshed mint count"
                );
                if self.counter.limit_reached() {
                    tracing::info!("Mint limit reached; no more tokens this season");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read mint count");
            }
        }
    }

    /// Run one full mint attempt.
    ///
    /// Re-fetches the count before submitting (this narrows but does not
    /// close the race against the on-chain counter; the contract alone
    /// enforces the true cap), then walks
    /// `AwaitingApproval → Mining → Idle`. A confirmed mint refreshes the
    /// counter and may derive the gallery link from the receipt.
    pub async fn mint(&mut self) {
        if !self.session.is_connected() {
            tracing::warn!("Cannot mint: wallet not connected");
            return;
        }
        if !self.session.on_expected_network() {
            tracing::warn!("Cannot mint: wrong network");
            return;
        }
        if self.counter.limit_reached() {
            tracing::info!("Cannot mint: limit already reached");
            return;
        }

        // Synchronous re-fetch before submitting
        match self.contract.total_mints().await {
            Ok(count) => self.counter.observe(count),
            Err(e) => {
                tracing::warn!(error = %e, "Mint aborted: could not read mint count");
                return;
            }
        }
        if self.counter.limit_reached() {
            tracing::info!(
                observed = self.counter.observed(),
                "Mint aborted: the max number of tokens has been claimed"
            );
            return;
        }

        self.phase = MintPhase::AwaitingApproval;
        tracing::info!("Going to pop the wallet now to pay gas");

        let tx_hash = match self.contract.submit_mint().await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                self.absorb_mint_failure(e);
                return;
            }
        };

        self.phase = MintPhase::Mining;
        tracing::info!(tx_hash = %tx_hash, "Mining, please wait");

        match self.contract.await_confirmation(tx_hash).await {
            Ok(receipt) => {
                metrics::record_mint_outcome(true);
                tracing::info!(
                    tx = %explorer_tx_link(&receipt.tx_hash),
                    block = receipt.block_number,
                    "Mint confirmed"
                );
                if let Some(token_id) = receipt.token_id {
                    // Races with the event monitor; last write wins
                    self.nft_link = Some(gallery_link(&self.contract_address, token_id));
                }
                self.phase = MintPhase::Idle;
                self.refresh_mint_count().await;
            }
            Err(e) => {
                self.absorb_mint_failure(e);
            }
        }
    }

    /// Handle an observed mint event, independent of the `mint()` path.
    ///
    /// Derives the gallery link and announces completion. Either writer
    /// may overwrite the other's link; that ordering is unspecified by
    /// design.
    pub fn observe_mint(&mut self, event: MintedEvent) {
        let link = gallery_link(&self.contract_address, event.token_id);
        tracing::info!(
            minter = %event.minter,
            token_id = %event.token_id,
            link = %link,
            "NFT minted; it can take up to 10 minutes to show up in the gallery"
        );
        self.nft_link = Some(link);
    }

    fn absorb_mint_failure(&mut self, error: GatewayError) {
        metrics::record_mint_outcome(false);
        match error {
            GatewayError::UserRejected => {
                tracing::info!("Mint cancelled: wallet approval rejected");
            }
            e => {
                tracing::warn!(error = %e, "Mint failed");
            }
        }
        self.phase = MintPhase::Idle;
    }

    /// Whether minting should currently be offered at all.
    pub fn mint_available(&self) -> bool {
        self.session.is_connected()
            && self.session.on_expected_network()
            && !self.counter.limit_reached()
            && self.phase == MintPhase::Idle
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn counter(&self) -> &MintCounter {
        &self.counter
    }

    pub fn phase(&self) -> MintPhase {
        self.phase
    }

    pub fn nft_link(&self) -> Option<&str> {
        self.nft_link.as_deref()
    }

    /// Snapshot the workflow for presentation.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            connected_address: self.session.address().map(|a| a.to_string()),
            on_expected_network: self.session.on_expected_network(),
            observed_mints: self.counter.observed(),
            mint_limit: self.counter.limit(),
            limit_reached: self.counter.limit_reached(),
            phase: self.phase,
            nft_link: self.nft_link.clone(),
            collection_link: crate::workflow::session::collection_link(),
        }
    }
}
