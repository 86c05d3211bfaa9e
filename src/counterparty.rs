//! Counterparty Finder (C9)
//!
//! A thin orchestrator over `OrderManager`'s pair-index lookups: given a
//! direct pair, enumerates the intra- and inter-orderbook counterparties
//! plus every base-token intermediary hop usable for a two-leg route.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order_manager::arena::PairHandle;
use crate::order_manager::OrderManager;
use crate::pair_index::CounterpartySource;
use alloy::primitives::Address;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CounterpartySet {
    pub intra_orderbook: Vec<PairHandle>,
    pub inter_orderbook: Vec<Vec<PairHandle>>,
    /// `intermediary token -> descending counterparty list` for a two-leg
    /// route via a configured base token.
    pub against_base_tokens: HashMap<Address, Vec<PairHandle>>,
}

/// Gathers every counterparty candidate for `handle` the round scheduler's
/// simulator can try, in one call.
pub fn find_counterparties(
    manager: &mut OrderManager,
    handle: PairHandle,
    base_tokens: &std::collections::HashSet<Address>,
) -> CounterpartySet {
    let mut intra = manager.get_counterparty_orders(handle, CounterpartySource::IntraOrderbook);
    let intra_orderbook = intra.pop().unwrap_or_default();
    let inter_orderbook = manager.get_counterparty_orders(handle, CounterpartySource::InterOrderbook);
    let against_base_tokens = manager.get_counterparty_orders_against_base_tokens(handle, base_tokens);

    CounterpartySet {
        intra_orderbook,
        inter_orderbook,
        against_base_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::decoder::OrderVersion;
    use crate::order_manager::{OrderManager, SgOrder};
    use crate::token::TokenRegistry;
    use crate::wallet::ChainClient;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;

    struct StubChain;
    #[async_trait]
    impl ChainClient for StubChain {
        async fn read_contract(
            &self,
            _: Address,
            fn_name: &str,
            _: Vec<u8>,
            _: Option<u64>,
        ) -> anyhow::Result<Vec<u8>> {
            match fn_name {
                "decimals" => Ok(vec![18]),
                "symbol" => Ok(b"TOK".to_vec()),
                _ => Ok(vec![0u8; 64]),
            }
        }
        async fn simulate_contract(
            &self,
            _: Address,
            _: Vec<u8>,
            _: Option<u64>,
        ) -> anyhow::Result<crate::wallet::SimulationResult> {
            unimplemented!()
        }
        async fn get_block_number(&self) -> anyhow::Result<u64> {
            Ok(1)
        }
    }

    fn make_sg_order(orderbook: Address, hash: &str, owner: Address, input: Address, output: Address) -> SgOrder {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(owner.as_slice());
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend_from_slice(Address::repeat_byte(0xE1).as_slice());
        bytes.extend_from_slice(Address::repeat_byte(0xE2).as_slice());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.push(1);
        bytes.extend_from_slice(input.as_slice());
        bytes.push(18);
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(1);
        bytes.extend_from_slice(output.as_slice());
        bytes.push(18);
        bytes.extend_from_slice(&[0u8; 32]);
        SgOrder {
            orderbook,
            hash: hash.to_string(),
            bytes,
            version: OrderVersion::V3,
            token_hints: StdHashMap::new(),
        }
    }

    #[tokio::test]
    async fn against_base_tokens_excludes_direct_sell_token_and_finds_hop() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        let weth = Address::repeat_byte(0x01);
        let usdc = Address::repeat_byte(0x02);
        let dai = Address::repeat_byte(0x03);

        // direct pair: sell weth for usdc
        let sg_direct = make_sg_order(ob, "0xdirect", owner, usdc, weth);
        mgr.add_order(&sg_direct, &chain).await.unwrap();

        // hop pair: sell usdc for dai, reachable from the direct pair's buy_token (usdc)
        let sg_hop = make_sg_order(ob, "0xhop", owner, dai, usdc);
        mgr.add_order(&sg_hop, &chain).await.unwrap();

        let round = mgr.get_next_round_orders();
        let direct = round
            .iter()
            .copied()
            .find(|h| {
                let p = mgr.get_pair(*h).unwrap();
                p.sell_token == weth && p.buy_token == usdc
            })
            .unwrap();

        let base_tokens = std::collections::HashSet::from([usdc, dai, weth]);
        let set = find_counterparties(&mut mgr, direct, &base_tokens);
        assert!(!set.against_base_tokens.contains_key(&usdc));
        assert!(set.against_base_tokens.contains_key(&dai));
    }
}
