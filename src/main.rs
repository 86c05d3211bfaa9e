//! Orderbook Arbitrage Solver — reactor binary
//!
//! Wires the library against its external collaborators (chain RPC via
//! `alloy`, an indexer HTTP source, a weighted-pool paths endpoint) and
//! drives the sync-then-round loop described in §2's data flow. Never
//! signs or broadcasts: each round's ready transactions are logged for
//! an external signer to pick up.

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::Parser;
use rain_solver_core::config::{self, SolverConfig};
use rain_solver_core::indexer::{HttpIndexerClient, IndexerClient};
use rain_solver_core::order_manager::{OrderManager, SgOrder};
use rain_solver_core::round_runner;
use rain_solver_core::router::aggregator::{AggregatorRouter, PoolCodeMap};
use rain_solver_core::router::stablecoin::StablecoinRouter;
use rain_solver_core::router::weighted_pool::{HttpPathsEndpoint, WeightedPoolRouter};
use rain_solver_core::router::RouterFacade;
use rain_solver_core::sync_loop;
use rain_solver_core::token::TokenRegistry;
use rain_solver_core::wallet::AlloyChainClient;
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "rain-solver", about = "Orderbook arbitrage solver reactor")]
struct Cli {
    /// Path to an additional .env file to load before the process env.
    #[arg(long)]
    config: Option<String>,

    /// Run the reactor without ever being wired to a live signer; logs
    /// every ready transaction instead of handing it off.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Some(path) = &cli.config {
        dotenv::from_path(path).ok();
    }
    if cli.dry_run {
        info!("starting in dry-run mode: no transaction will be handed to a signer");
    }

    let config = config::load_config().context("failed to load solver configuration")?;
    info!(
        orderbooks = config.orderbooks.len(),
        sources = config.indexer_sources.len(),
        "solver configuration loaded"
    );

    let chain = AlloyChainClient::connect_http(&config.rpc_url).context("failed to connect to chain RPC")?;
    let indexer = HttpIndexerClient::new(config.indexer_sources.clone());
    let router = build_router(&config);
    let mut manager = OrderManager::new(TokenRegistry::new(), config.owner_limits.clone());

    let mut round_number: u64 = 0;
    loop {
        match indexer.get_upstream_events().await {
            Ok(batch) => {
                let accept_all = |_: &SgOrder| true;
                let status = sync_loop::sync(&mut manager, batch, &chain, &accept_all).await;
                for (source, orderbooks) in &status {
                    for (ob, ob_status) in orderbooks {
                        info!(
                            source,
                            orderbook = ob,
                            added = ob_status.added.len(),
                            removed = ob_status.removed.len(),
                            failed = ob_status.failed_adds.len(),
                            "sync applied"
                        );
                    }
                }
            }
            Err(e) => warn!(error = %e, "sync: failed to fetch upstream events, skipping this tick"),
        }

        manager.downscale_protection(round_number % 20 == 0, &chain).await;

        round_number += 1;
        // `run_round` already emits the round's report as a single
        // tracing event (§7 propagation policy); nothing further to log here.
        let (_report, opportunities) = round_runner::run_round(
            &mut manager,
            &router,
            &chain,
            &config,
            round_number,
            eth_price_estimate(),
            gas_price_estimate(&config),
        )
        .await;

        for opp in &opportunities {
            if cli.dry_run {
                info!(
                    route_processor = opp.route_processor,
                    estimated_profit = %opp.estimated_profit,
                    block = opp.opp_block_number,
                    "dry-run: would hand off transaction to signer"
                );
            } else {
                error!("no signer wired: opportunity found but cannot be broadcast in this build");
            }
        }

        tokio::time::sleep(config.round_interval).await;
    }
}

fn build_router(config: &SolverConfig) -> RouterFacade {
    let aggregator = AggregatorRouter::new(PoolCodeMap::new());
    let weighted_pool = WeightedPoolRouter::new(
        Box::new(HttpPathsEndpoint::new(format!(
            "{}/paths",
            config.rpc_url.trim_end_matches('/')
        ))),
        config.arb_contract,
    );
    let stablecoin = StablecoinRouter::new(config.stablecoins.clone());

    RouterFacade::new(
        vec![Box::new(aggregator), Box::new(weighted_pool), Box::new(stablecoin)],
        config.timeout,
    )
}

/// Stand-in for an external price feed (§1: out of scope). A production
/// deployment wires this to the same oracle the gas estimator uses.
fn eth_price_estimate() -> U256 {
    U256::from(3_000u64) * U256::from(10u64).pow(U256::from(18u64))
}

fn gas_price_estimate(config: &SolverConfig) -> U256 {
    U256::from((config.gas_price_multiplier * 1e9) as u64)
}
