//! leafmint: mint workflow runner.
//!
//! Thin binary over the library: load config, wire the gateways, run one
//! of the workflow entry points.

use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use tokio::sync::{broadcast, mpsc};

use leafmint::blockchain::{BlockchainClient, SignerWallet};
use leafmint::config::{self, loader::CONTRACT_ADDRESS_ENV_VAR};
use leafmint::contract::{MintMonitor, NftContract};
use leafmint::observability::{logging, metrics};
use leafmint::workflow::{MintWorkflow, EXPECTED_CHAIN_ID};

#[derive(Parser)]
#[command(name = "leafmint")]
#[command(about = "Mint workflow runner for the collection contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "leafmint.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, check the network, and print the workflow state
    Status,
    /// Run one full mint attempt
    Mint,
    /// Follow on-chain mint events until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::default_config()?
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        rpc_url = %config.rpc.rpc_url,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let contract_address: Address = config.contract.address.parse().map_err(|_| {
        format!(
            "Contract address not configured (set contract.address or {})",
            CONTRACT_ADDRESS_ENV_VAR
        )
    })?;

    let client = BlockchainClient::new(config.rpc.clone())?;
    if !client.is_healthy().await {
        tracing::warn!("Chain unreachable; operations will likely fail");
    }

    let wallet = SignerWallet::from_env(client.clone(), EXPECTED_CHAIN_ID.into());
    let contract = NftContract::new(client.clone(), contract_address, wallet.signer().cloned())?;
    let mut workflow = MintWorkflow::new(wallet, contract, contract_address);

    match cli.command {
        Commands::Status => {
            workflow.connect().await;
            workflow.check_network().await;
            workflow.refresh_mint_count().await;
            println!("{}", serde_json::to_string_pretty(&workflow.snapshot())?);
        }
        Commands::Mint => {
            workflow.connect().await;
            workflow.check_network().await;
            workflow.refresh_mint_count().await;
            workflow.mint().await;
            println!("{}", serde_json::to_string_pretty(&workflow.snapshot())?);
        }
        Commands::Watch => {
            workflow.resume().await;
            workflow.check_network().await;
            workflow.refresh_mint_count().await;

            let (events_tx, mut events_rx) = mpsc::unbounded_channel();
            let (shutdown_tx, _) = broadcast::channel(1);

            let monitor = MintMonitor::new(
                client.clone(),
                contract_address,
                Duration::from_millis(config.contract.event_poll_interval_ms),
                events_tx,
            );
            tokio::spawn(monitor.run(shutdown_tx.subscribe()));

            loop {
                tokio::select! {
                    event = events_rx.recv() => match event {
                        Some(event) => workflow.observe_mint(event),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutting down");
                        let _ = shutdown_tx.send(());
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
