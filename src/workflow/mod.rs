//! The mint workflow: session state and the sequencing controller.

pub mod controller;
pub mod session;

pub use controller::{MintPhase, MintWorkflow, WorkflowSnapshot};
pub use session::{MintCounter, Session};

use crate::blockchain::types::ChainId;

/// Global cap on the number of tokens the contract will mint.
pub const MINT_LIMIT: u64 = 50;

/// The one network the contract is deployed on (`0x4`, Rinkeby).
pub const EXPECTED_CHAIN_ID: ChainId = ChainId(4);

/// Marketplace slug for the collection.
pub const COLLECTION_SLUG: &str = "squarenft-yxwem3h1yw";
