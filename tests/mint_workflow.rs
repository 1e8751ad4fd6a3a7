//! End-to-end workflow tests against mock gateways.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, U256};

use leafmint::blockchain::ChainId;
use leafmint::gateway::{
    ContractGateway, GatewayError, GatewayResult, MintReceipt, MintedEvent, WalletGateway,
};
use leafmint::workflow::{MintPhase, MintWorkflow};

fn test_account() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        .parse()
        .unwrap()
}

fn test_contract_address() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        .parse()
        .unwrap()
}

struct MockWallet {
    present: bool,
    accounts: Vec<Address>,
    chain_id: &'static str,
}

impl MockWallet {
    fn connected() -> Self {
        Self {
            present: true,
            accounts: vec![test_account()],
            chain_id: "0x4",
        }
    }

    fn absent() -> Self {
        Self {
            present: false,
            accounts: Vec::new(),
            chain_id: "0x4",
        }
    }

    fn on_chain(chain_id: &'static str) -> Self {
        Self {
            chain_id,
            ..Self::connected()
        }
    }
}

impl WalletGateway for MockWallet {
    async fn request_accounts(&self) -> GatewayResult<Vec<Address>> {
        if !self.present {
            return Err(GatewayError::WalletAbsent);
        }
        Ok(self.accounts.clone())
    }

    async fn accounts(&self) -> GatewayResult<Vec<Address>> {
        self.request_accounts().await
    }

    async fn chain_id(&self) -> GatewayResult<ChainId> {
        if !self.present {
            return Err(GatewayError::WalletAbsent);
        }
        ChainId::from_hex(self.chain_id).map_err(|e| GatewayError::RemoteCall(e.to_string()))
    }
}

#[derive(Clone, Copy)]
enum SubmitBehavior {
    Confirm { token_id: u64 },
    Reject,
}

struct MockContract {
    /// Successive `getTotalMints` returns; the last value repeats.
    totals: Mutex<VecDeque<u64>>,
    submit: SubmitBehavior,
    total_calls: AtomicU32,
    submit_calls: AtomicU32,
}

impl MockContract {
    fn with_totals(totals: &[u64], submit: SubmitBehavior) -> Self {
        Self {
            totals: Mutex::new(totals.iter().copied().collect()),
            submit,
            total_calls: AtomicU32::new(0),
            submit_calls: AtomicU32::new(0),
        }
    }

    fn total_calls(&self) -> u32 {
        self.total_calls.load(Ordering::SeqCst)
    }

    fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl ContractGateway for &MockContract {
    async fn total_mints(&self) -> GatewayResult<u64> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        let mut totals = self.totals.lock().unwrap();
        let value = if totals.len() > 1 {
            totals.pop_front().unwrap()
        } else {
            *totals.front().expect("mock has no totals")
        };
        Ok(value)
    }

    async fn submit_mint(&self) -> GatewayResult<TxHash> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match self.submit {
            SubmitBehavior::Confirm { .. } => Ok(TxHash::ZERO),
            SubmitBehavior::Reject => Err(GatewayError::UserRejected),
        }
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> GatewayResult<MintReceipt> {
        match self.submit {
            SubmitBehavior::Confirm { token_id } => Ok(MintReceipt {
                tx_hash,
                block_number: 1,
                token_id: Some(U256::from(token_id)),
            }),
            SubmitBehavior::Reject => Err(GatewayError::UserRejected),
        }
    }
}

async fn connected_workflow(
    contract: &MockContract,
) -> MintWorkflow<MockWallet, &MockContract> {
    let mut workflow =
        MintWorkflow::new(MockWallet::connected(), contract, test_contract_address());
    workflow.connect().await;
    workflow.check_network().await;
    workflow
}

#[tokio::test]
async fn connect_without_wallet_leaves_session_empty() {
    let contract = MockContract::with_totals(&[0], SubmitBehavior::Reject);
    let mut workflow =
        MintWorkflow::new(MockWallet::absent(), &contract, test_contract_address());

    workflow.connect().await;

    assert!(!workflow.session().is_connected());
    assert!(workflow.session().address().is_none());
    assert!(!workflow.mint_available());
}

#[tokio::test]
async fn connect_records_first_account() {
    let contract = MockContract::with_totals(&[0], SubmitBehavior::Reject);
    let workflow = connected_workflow(&contract).await;

    assert_eq!(workflow.session().address(), Some(test_account()));
    assert!(workflow.session().on_expected_network());
}

#[tokio::test]
async fn network_check_accepts_only_the_expected_chain() {
    let contract = MockContract::with_totals(&[0], SubmitBehavior::Reject);

    for (chain, expected) in [("0x4", true), ("0x1", false), ("0x38", false)] {
        let mut workflow = MintWorkflow::new(
            MockWallet::on_chain(chain),
            &contract,
            test_contract_address(),
        );
        workflow.connect().await;
        workflow.check_network().await;
        assert_eq!(
            workflow.session().on_expected_network(),
            expected,
            "chain {}",
            chain
        );
    }
}

#[tokio::test]
async fn limit_latch_flips_once_and_never_reverts() {
    let contract =
        MockContract::with_totals(&[48, 49, 50, 3], SubmitBehavior::Reject);
    let mut workflow = connected_workflow(&contract).await;

    workflow.refresh_mint_count().await;
    assert!(!workflow.counter().limit_reached());

    workflow.refresh_mint_count().await;
    assert!(!workflow.counter().limit_reached());

    workflow.refresh_mint_count().await;
    assert!(workflow.counter().limit_reached());

    // A later, lower reading does not un-reach the limit
    workflow.refresh_mint_count().await;
    assert!(workflow.counter().limit_reached());
    assert_eq!(workflow.counter().observed(), 50);
}

#[tokio::test]
async fn mint_at_limit_performs_no_remote_call() {
    let contract = MockContract::with_totals(&[50], SubmitBehavior::Confirm { token_id: 50 });
    let mut workflow = connected_workflow(&contract).await;

    workflow.refresh_mint_count().await;
    assert!(workflow.counter().limit_reached());
    let reads_before = contract.total_calls();

    workflow.mint().await;

    assert_eq!(contract.submit_calls(), 0);
    assert_eq!(contract.total_calls(), reads_before);
    assert!(workflow.counter().limit_reached());
}

#[tokio::test]
async fn mint_on_wrong_network_is_refused() {
    let contract = MockContract::with_totals(&[10], SubmitBehavior::Confirm { token_id: 10 });
    let mut workflow = MintWorkflow::new(
        MockWallet::on_chain("0x1"),
        &contract,
        test_contract_address(),
    );
    workflow.connect().await;
    workflow.check_network().await;

    workflow.mint().await;

    assert_eq!(contract.submit_calls(), 0);
    assert!(!workflow.mint_available());
}

#[tokio::test]
async fn successful_mint_reaches_the_limit() {
    // connect → count 49 → mint succeeds → count 50 → limit reached
    let contract =
        MockContract::with_totals(&[49, 49, 50], SubmitBehavior::Confirm { token_id: 49 });
    let mut workflow = connected_workflow(&contract).await;

    workflow.refresh_mint_count().await;
    assert_eq!(workflow.counter().observed(), 49);
    assert!(workflow.mint_available());

    workflow.mint().await;

    assert_eq!(workflow.phase(), MintPhase::Idle);
    assert_eq!(workflow.counter().observed(), 50);
    assert!(workflow.counter().limit_reached());
    assert!(!workflow.mint_available());
    assert_eq!(contract.submit_calls(), 1);

    let link = workflow.nft_link().expect("link derived from receipt");
    assert_eq!(
        link,
        format!(
            "https://testnets.opensea.io/assets/{}/49",
            test_contract_address()
        )
    );
}

#[tokio::test]
async fn rejected_mint_returns_to_idle_without_side_effects() {
    let contract = MockContract::with_totals(&[10], SubmitBehavior::Reject);
    let mut workflow = connected_workflow(&contract).await;

    workflow.refresh_mint_count().await;
    let reads_before = contract.total_calls();

    workflow.mint().await;

    assert_eq!(workflow.phase(), MintPhase::Idle);
    assert_eq!(contract.submit_calls(), 1);
    // Pre-submission re-fetch happened, but no refresh after the failure
    assert_eq!(contract.total_calls(), reads_before + 1);
    assert!(workflow.nft_link().is_none());
    assert!(workflow.mint_available());
}

#[tokio::test]
async fn event_path_sets_and_overwrites_the_link() {
    let contract = MockContract::with_totals(&[10], SubmitBehavior::Confirm { token_id: 10 });
    let mut workflow = connected_workflow(&contract).await;

    workflow.observe_mint(MintedEvent {
        minter: test_account(),
        token_id: U256::from(7),
    });
    assert!(workflow.nft_link().unwrap().ends_with("/7"));

    // Last write wins between the event path and any earlier link
    workflow.observe_mint(MintedEvent {
        minter: test_account(),
        token_id: U256::from(8),
    });
    assert!(workflow.nft_link().unwrap().ends_with("/8"));
}

#[tokio::test]
async fn snapshot_reflects_workflow_state() {
    let contract = MockContract::with_totals(&[12], SubmitBehavior::Reject);
    let mut workflow = connected_workflow(&contract).await;
    workflow.refresh_mint_count().await;

    let snapshot = workflow.snapshot();
    assert_eq!(
        snapshot.connected_address,
        Some(test_account().to_string())
    );
    assert!(snapshot.on_expected_network);
    assert_eq!(snapshot.observed_mints, 12);
    assert_eq!(snapshot.mint_limit, 50);
    assert!(!snapshot.limit_reached);
    assert!(snapshot.nft_link.is_none());
    assert!(snapshot
        .collection_link
        .starts_with("https://testnets.opensea.io/collection/"));

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"phase\":\"idle\""));
}
