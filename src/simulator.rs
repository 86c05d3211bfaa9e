//! Trade Simulator (C8)
//!
//! For a chosen `(order, route)` pair: asks the Router Façade for the best
//! external quote, gates on the order's own ratio, builds the take-orders
//! calldata shape, runs the two-stage gas-aware dry-run that computes the
//! minimum required bounty, and produces a ready-to-sign transaction.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::compiler::compile_bounty_bytecode;
use crate::error::SimError;
use crate::order::types::Pair;
use crate::router::{QuoteParams, RouterFacade};
use crate::wallet::ChainClient;
use alloy::primitives::{Address, U256};

#[derive(Debug, Clone)]
pub struct RawTx {
    pub to: Address,
    pub data: Vec<u8>,
    pub gas_price: U256,
}

#[derive(Debug, Clone)]
pub struct SimOutput {
    pub route_processor: &'static str,
    pub rawtx: RawTx,
    pub estimated_gas_cost: U256,
    pub opp_block_number: u64,
    pub estimated_profit: U256,
}

pub struct SimInput<'a> {
    pub order_details: &'a Pair,
    pub signer: Address,
    pub eth_price_18: U256,
    pub to_token: Address,
    pub from_token: Address,
    pub block_number: u64,
    pub is_partial: bool,
    pub max_input_18: U256,
    pub gas_price: U256,
    pub gas_coverage_percentage: String,
    pub max_ratio: bool,
    pub arb_contract: Address,
}

/// §4.8 step 7's headroom: `floor(gas_coverage_percentage * 1.03)`,
/// computed in integer arithmetic as `p * 103 / 100`.
pub fn headroom_pct(coverage_pct: u64) -> u64 {
    coverage_pct * 103 / 100
}

/// The minimum bounty (native wei) the compiled expression enforces:
/// `gas_cost_wei * pct / 100`.
pub fn required_bounty_wei(gas_cost_wei: U256, pct: u64) -> U256 {
    gas_cost_wei.saturating_mul(U256::from(pct)) / U256::from(100u64)
}

/// §4.8 step 8's profit figure: `max_input * (market_price - order_ratio) /
/// 1e18 * eth_price_18 / 1e18`. Returns zero if the market price does not
/// exceed the order's ratio (the ratio gate should have already rejected
/// that case, but the formula is total).
pub fn estimated_profit(
    max_input: U256,
    market_price_18: U256,
    order_ratio_18: U256,
    eth_price_18: U256,
) -> U256 {
    if market_price_18 <= order_ratio_18 {
        return U256::ZERO;
    }
    let margin_18 = market_price_18 - order_ratio_18;
    let one_e18 = U256::from(10u64).pow(U256::from(18u64));
    let profit_native = max_input.saturating_mul(margin_18) / one_e18;
    profit_native.saturating_mul(eth_price_18) / one_e18
}

/// Builds the `TakeOrdersConfig` + `Task` payload the dry-run is actually
/// run against: the three config scalars, the route addresses, and the
/// stage's recompiled bounty bytecode, all concatenated big-endian. This
/// is what makes stage 1 and stage 2 distinct calls (§4.8 steps 6/7), each
/// embedding its own bytecode rather than a shared placeholder.
fn encode_take_orders_task(
    minimum_input: U256,
    maximum_input: U256,
    maximum_io_ratio: U256,
    route: &[Address],
    bytecode: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(96 + route.len() * 20 + bytecode.len());
    out.extend_from_slice(&minimum_input.to_be_bytes::<32>());
    out.extend_from_slice(&maximum_input.to_be_bytes::<32>());
    out.extend_from_slice(&maximum_io_ratio.to_be_bytes::<32>());
    for addr in route {
        out.extend_from_slice(addr.as_slice());
    }
    out.extend_from_slice(bytecode);
    out
}

pub struct Simulator<'a> {
    router: &'a RouterFacade,
    chain: &'a dyn ChainClient,
}

impl<'a> Simulator<'a> {
    pub fn new(router: &'a RouterFacade, chain: &'a dyn ChainClient) -> Self {
        Self { router, chain }
    }

    pub async fn simulate(&self, input: SimInput<'_>) -> Result<SimOutput, SimError> {
        use crate::fixed_float::scale_from_18;

        let max_input = scale_from_18(input.max_input_18, input.order_details.sell_decimals);

        let quote_params = QuoteParams {
            from_token: input.from_token,
            to_token: input.to_token,
            amount_in: max_input,
            gas_price: Some(input.gas_price),
            block: Some(input.block_number),
            sender: Some(input.signer),
            ignore_cache: false,
            sushi_route_type: None,
        };
        let best = self.router.best_quote(&quote_params).await?;
        let p_market = best.price_18;

        let order_ratio = input
            .order_details
            .quote_ratio()
            .ok_or_else(|| SimError::NoOpportunity {
                stage: 0,
                reason: "order has no quote yet".to_string(),
            })?;

        if p_market < order_ratio {
            return Err(SimError::OrderRatioGreaterThanMarketPrice {
                order_ratio,
                market_price: p_market,
            });
        }

        let maximum_input = if input.is_partial {
            max_input
        } else {
            U256::MAX
        };
        let maximum_io_ratio = if input.max_ratio { U256::MAX } else { p_market };

        // Step 5/6: stage 1 dry-run with a zero-bounty task (no estimate yet).
        let stage1_bytecode =
            compile_bounty_bytecode(input.eth_price_18, U256::ZERO, "0", input.signer);
        let stage1_task = encode_take_orders_task(
            U256::from(1u64), // minimum_input
            maximum_input,
            maximum_io_ratio,
            &best.route,
            &stage1_bytecode,
        );
        let stage1 = self
            .chain
            .simulate_contract(input.arb_contract, stage1_task, Some(input.block_number))
            .await
            .map_err(|e| SimError::NoOpportunity {
                stage: 1,
                reason: e.to_string(),
            })?;

        let coverage_pct: u64 = input.gas_coverage_percentage.parse().unwrap_or(0);
        let stage1_gas_cost = U256::from(stage1.gas_used).saturating_mul(input.gas_price);

        // Step 7: headroom recompute and stage 2 dry-run, against the task
        // that actually embeds the recompiled bounty-bearing bytecode.
        let headroom = headroom_pct(coverage_pct);
        let stage2_bytecode = compile_bounty_bytecode(
            input.eth_price_18,
            stage1_gas_cost,
            &headroom.to_string(),
            input.signer,
        );
        let stage2_task = encode_take_orders_task(
            U256::from(1u64),
            maximum_input,
            maximum_io_ratio,
            &best.route,
            &stage2_bytecode,
        );
        let stage2 = self
            .chain
            .simulate_contract(input.arb_contract, stage2_task, Some(input.block_number))
            .await
            .map_err(|e| SimError::NoOpportunity {
                stage: 2,
                reason: e.to_string(),
            })?;

        let estimated_gas_cost = U256::from(stage2.gas_used).saturating_mul(input.gas_price);

        // Step 8: final bytecode, no headroom, not re-estimated.
        let final_bytecode = compile_bounty_bytecode(
            input.eth_price_18,
            estimated_gas_cost,
            &input.gas_coverage_percentage,
            input.signer,
        );

        let profit = estimated_profit(max_input, p_market, order_ratio, input.eth_price_18);

        Ok(SimOutput {
            route_processor: best.source,
            rawtx: RawTx {
                to: input.arb_contract,
                data: final_bytecode,
                gas_price: input.gas_price,
            },
            estimated_gas_cost,
            opp_block_number: input.block_number,
            estimated_profit: profit,
        })
    }
}
