//! Round Runner (§5 reactor driver)
//!
//! Turns one tick of the scheduler into a bounded fan-out over the
//! round's slice of pairs: quoting is serialized through the Order
//! Manager (the one mutation every pair-level task needs), then each
//! pair's dry-run runs concurrently against an owned `Pair` snapshot,
//! capped by `config.max_concurrent_simulations` (§NEW-AMBIENT).
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::config::SolverConfig;
use crate::error::SimError;
use crate::fixed_float::scale_to_18;
use crate::order::types::Pair;
use crate::order_manager::arena::PairHandle;
use crate::order_manager::OrderManager;
use crate::report::RoundReport;
use crate::router::RouterFacade;
use crate::simulator::{SimInput, SimOutput, Simulator};
use crate::wallet::ChainClient;
use alloy::primitives::U256;
use futures::stream::{self, StreamExt};

/// Runs one round: fetches the scheduler's slice, quotes it, dry-runs
/// every pair, and returns the emitted report plus any ready-to-sign
/// opportunities for an external signer/broadcaster (§2 data flow).
pub async fn run_round(
    manager: &mut OrderManager,
    router: &RouterFacade,
    chain: &dyn ChainClient,
    config: &SolverConfig,
    round_number: u64,
    eth_price_18: U256,
    gas_price: U256,
) -> (RoundReport, Vec<SimOutput>) {
    let mut report = RoundReport::new(round_number);
    let handles = manager.get_next_round_orders();
    let block_number = chain.get_block_number().await.unwrap_or(0);

    for handle in &handles {
        if let Err(e) = manager.quote_order(*handle, chain, Some(block_number)).await {
            report.record_error(&handle_label(*handle), "quote_failed", e.to_string());
        }
    }

    // The one exception to single-writer ownership (§9 design note): each
    // concurrent task below gets its own owned snapshot of the `Pair` it
    // dry-runs, not a reference into the arena.
    let pairs: Vec<(PairHandle, Pair)> = handles
        .into_iter()
        .filter_map(|h| manager.get_pair(h).map(|p| (h, p.clone())))
        .collect();

    let simulator = Simulator::new(router, chain);
    let concurrency = config.max_concurrent_simulations.max(1);
    let results: Vec<(PairHandle, String, Result<SimOutput, SimError>)> = stream::iter(pairs)
        .map(|(handle, pair)| {
            let simulator = &simulator;
            async move {
                let max_input_18 = scale_to_18(pair.sell_vault_balance, pair.sell_decimals);
                let input = SimInput {
                    order_details: &pair,
                    signer: config.signer_address,
                    eth_price_18,
                    to_token: pair.buy_token,
                    from_token: pair.sell_token,
                    block_number,
                    is_partial: !config.max_ratio,
                    max_input_18,
                    gas_price,
                    gas_coverage_percentage: config.gas_coverage_percentage.clone(),
                    max_ratio: config.max_ratio,
                    arb_contract: config.arb_contract,
                };
                let hash = pair.take_order.id.clone();
                (handle, hash, simulator.simulate(input).await)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut opportunities = Vec::new();
    for (_, hash, result) in results {
        report.record_attempt();
        match result {
            Ok(output) => {
                report.record_opportunity();
                opportunities.push(output);
            }
            Err(e) => {
                report.record_error(&hash, "no_opportunity", e.to_string());
            }
        }
    }

    report.emit();
    (report, opportunities)
}

fn handle_label(handle: PairHandle) -> String {
    format!("{handle:?}")
}
