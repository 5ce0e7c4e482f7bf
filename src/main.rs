//! Wiring entrypoint. Loads config, brings up logging, and drives the
//! engine against whatever `collab::StreamSource` the deployment supplies.
//!
//! This binary does not itself speak to a geyser/yellowstone endpoint —
//! that transport is an external collaborator (see `collab::StreamSource`)
//! and out of scope here. What this binary owns is the RPC-backed
//! bootstrap fetcher (the one network client this crate does need, for
//! the lifecycle bootstrap loop) and the plumbing that ties config,
//! logging and the engine loop together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use pool_state_engine::collab::{BootstrapFetcher, StreamSource};
use pool_state_engine::ingress::{AccountUpdate, TxUpdate};
use pool_state_engine::types::Origin;
use pool_state_engine::{Engine, EngineConfig};
use solana_sdk::commitment_config::CommitmentConfig;

#[derive(Parser, Debug)]
#[command(name = "pool-state-engine", about = "Off-chain AMM pool-state mirror and quoter")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

/// Fetches a single account over RPC when the topology bootstrap loop asks
/// for one. Mirrors the teacher's `create_nonblocking_rpc_client` pattern:
/// a single long-lived nonblocking client, processed commitment, 30s
/// timeout.
struct RpcBootstrapFetcher {
    client: solana_client::nonblocking::rpc_client::RpcClient,
}

impl RpcBootstrapFetcher {
    fn new(rpc_url: String) -> Self {
        let client = solana_client::nonblocking::rpc_client::RpcClient::new_with_timeout_and_commitment(
            rpc_url,
            Duration::from_secs(30),
            CommitmentConfig::processed(),
        );
        Self { client }
    }
}

#[async_trait]
impl BootstrapFetcher for RpcBootstrapFetcher {
    async fn fetch_account(&self, pubkey: solana_sdk::pubkey::Pubkey) -> Option<AccountUpdate> {
        let slot = self.client.get_slot().await.ok()?;
        let account = self.client.get_account(&pubkey).await.ok()?;
        Some(AccountUpdate {
            pubkey,
            owner: account.owner,
            data: account.data,
            slot,
            write_version: 0,
            lamports: account.lamports,
            source: Origin::Bootstrap,
        })
    }
}

/// A `StreamSource` that never produces an update. A production deployment
/// replaces this with a real subscription (geyser, yellowstone-grpc, a
/// websocket account-subscribe fan-in); this is what lets the engine loop
/// start and shut down cleanly with nothing wired up yet.
struct NullStreamSource;

#[async_trait]
impl StreamSource for NullStreamSource {
    async fn next_account_update(&mut self) -> Option<AccountUpdate> {
        None
    }
    async fn next_tx_update(&mut self) -> Option<TxUpdate> {
        None
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = EngineConfig::load(&args.config)
        .map_err(|e| anyhow::anyhow!("failed to load config from {}: {e}", args.config.display()))?;

    pool_state_engine::logging::init_logger(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let bootstrap = Arc::new(RpcBootstrapFetcher::new(config.rpc_url.clone()));
    let mut engine = Engine::new(&config, bootstrap)
        .map_err(|e| anyhow::anyhow!("failed to build engine from config: {e}"))?;

    tracing::info!("pool-state-engine starting, no account-update stream wired: idle until one is supplied");

    let mut stream = NullStreamSource;
    engine.run(&mut stream).await;

    tracing::info!("account-update stream closed, shutting down");
    Ok(())
}
