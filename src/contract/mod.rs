//! The fixed deployed collection contract: ABI bindings, the production
//! contract gateway, and the mint event monitor.

pub mod monitor;
pub mod nft;

pub use monitor::MintMonitor;
pub use nft::NftContract;
