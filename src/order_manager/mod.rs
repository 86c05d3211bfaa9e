//! Order Manager (C4)
//!
//! Owns all live state: `owners_map`, the two `PairIndex` views, and
//! `vault_map`. Accepts add/remove/reconcile events and emits each
//! round's slice of orders. This is the largest component (spec budgets
//! it at 22% of the core) because it is the only single-writer owner of
//! state every other component reads.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

pub mod arena;

use crate::downscale;
use crate::error::AddError;
use crate::fixed_float::PackedFloat;
use crate::order::decoder::{try_from_bytes, OrderVersion};
use crate::order::types::{Order, OrderProfile, OwnerProfile, Pair, Quote, TakeOrderDetails, Vault};
use crate::pair_index::{CounterpartySource, PairIndex};
use crate::token::{normalize, Token, TokenRegistry};
use crate::wallet::ChainClient;
use arena::{PairArena, PairHandle};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const DEFAULT_OWNER_LIMIT: u32 = 25;

/// A hint the subgraph record carries about a token it names, used before
/// falling back to an on-chain `symbol()`/`decimals()` call (§4.4
/// three-level lookup: watched cache -> subgraph record -> on-chain).
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TokenHint {
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// The raw record `add_order`/`remove_orders` consume. Stands in for the
/// subgraph's order record (§1: the indexer is an external collaborator,
/// referenced only through this shape).
#[derive(Debug, Clone)]
pub struct SgOrder {
    pub orderbook: Address,
    pub hash: String,
    pub bytes: Vec<u8>,
    pub version: OrderVersion,
    pub token_hints: HashMap<Address, TokenHint>,
}

#[derive(Debug, Clone, Default)]
pub struct ManagerMetadata {
    pub total_orders: usize,
    pub total_owners: usize,
    pub total_pairs: usize,
    pub total_distinct_pairs: usize,
}

pub struct OrderManager {
    owners_map: HashMap<String, HashMap<String, OwnerProfile>>,
    /// `orderbook -> sell_token -> buy_token -> orderhash -> handle`.
    oi_pair_map: PairIndex,
    /// The mirrored `orderbook -> buy_token -> sell_token -> orderhash ->
    /// handle` view.
    io_pair_map: PairIndex,
    /// `orderbook -> owner -> token.address -> vault_id -> Vault`.
    vault_map: HashMap<String, HashMap<String, HashMap<String, HashMap<String, Vault>>>>,
    arena: PairArena,
    owner_limits: HashMap<String, u32>,
    watched_tokens: TokenRegistry,
    default_owner_limit: u32,
}

impl OrderManager {
    pub fn new(watched_tokens: TokenRegistry, owner_limits: HashMap<Address, u32>) -> Self {
        Self {
            owners_map: HashMap::new(),
            oi_pair_map: PairIndex::new(),
            io_pair_map: PairIndex::new(),
            vault_map: HashMap::new(),
            arena: PairArena::new(),
            owner_limits: owner_limits
                .into_iter()
                .map(|(k, v)| (normalize(k), v))
                .collect(),
            watched_tokens,
            default_owner_limit: DEFAULT_OWNER_LIMIT,
        }
    }

    /// Decodes `sg_order`, fans out the input x output cross product
    /// (same-token rows elided), resolves each token's decimals via the
    /// three-level lookup, fabricates one `Pair` per row, and inserts into
    /// every index. Idempotent: re-adding an already-present hash flips
    /// `active=true` without duplicating pairs.
    pub async fn add_order(
        &mut self,
        sg: &SgOrder,
        chain: &dyn ChainClient,
    ) -> Result<(), AddError> {
        let ob_key = normalize(sg.orderbook);
        let order = try_from_bytes(&sg.bytes, sg.version).map_err(AddError::DecodeFailed)?;
        let owner_key = normalize(order.owner());
        let hash_key = sg.hash.to_lowercase();

        if let Some(existing) = self
            .owners_map
            .get_mut(&ob_key)
            .and_then(|m| m.get_mut(&owner_key))
            .and_then(|p| p.orders.get_mut(&hash_key))
        {
            existing.active = true;
            debug!(hash = %hash_key, "add_order: already present, flipped active");
            return Ok(());
        }

        let mut rows = Vec::new();
        for out_idx in 0..order.num_outputs() {
            for in_idx in 0..order.num_inputs() {
                let (sell_token, buy_token) = order
                    .io_tokens(out_idx, in_idx)
                    .expect("indices within computed bounds");
                if sell_token == buy_token {
                    continue;
                }
                rows.push((out_idx, in_idx, sell_token, buy_token));
            }
        }

        let mut handles = Vec::with_capacity(rows.len());
        for (out_idx, in_idx, sell_token, buy_token) in &rows {
            let sell = self.resolve_token(*sell_token, sg, chain).await?;
            let buy = self.resolve_token(*buy_token, sg, chain).await?;

            let pair = Pair {
                orderbook: sg.orderbook,
                buy_token: buy.address,
                buy_symbol: buy.symbol.clone(),
                buy_decimals: buy.decimals,
                buy_vault_balance: U256::ZERO,
                sell_token: sell.address,
                sell_symbol: sell.symbol.clone(),
                sell_decimals: sell.decimals,
                sell_vault_balance: U256::ZERO,
                take_order: TakeOrderDetails {
                    id: hash_key.clone(),
                    order: order.clone(),
                    input_io_index: *in_idx,
                    output_io_index: *out_idx,
                    signed_context: Vec::new(),
                    quote: None,
                },
            };
            let handle = self.arena.insert(pair);
            self.oi_pair_map
                .add(sg.orderbook, &hash_key, sell.address, buy.address, handle);
            self.io_pair_map
                .add(sg.orderbook, &hash_key, buy.address, sell.address, handle);
            self.ensure_vault_placeholder(sg.orderbook, order.owner(), sell.address);
            self.ensure_vault_placeholder(sg.orderbook, order.owner(), buy.address);
            handles.push(handle);
        }

        let owner_profile = self
            .owners_map
            .entry(ob_key)
            .or_default()
            .entry(owner_key)
            .or_insert_with(|| OwnerProfile::new(self.owner_limit_for(&order.owner())));
        owner_profile.orders.insert(
            hash_key,
            OrderProfile {
                active: true,
                order,
                take_orders: handles,
            },
        );
        Ok(())
    }

    /// For each order, deletes `owners_map`'s entry (freeing the arena
    /// slots of its `take_orders`) and, separately, deletes the pair-map
    /// entries implied by *this* record's own input x output cross
    /// product. Per §9 open question 1 this is reproduced as documented:
    /// if the record driving removal implies a different cross product
    /// than the one that created the stored pairs, the pair-map deletion
    /// can miss entries and leave orphans. That is not silently fixed
    /// here.
    pub fn remove_orders(&mut self, sg_orders: &[SgOrder]) {
        for sg in sg_orders {
            let ob_key = normalize(sg.orderbook);
            let hash_key = sg.hash.to_lowercase();

            let Ok(order) = try_from_bytes(&sg.bytes, sg.version) else {
                warn!(hash = %hash_key, "remove_orders: could not decode record, skipping pair-map cleanup");
                continue;
            };
            let owner_key = normalize(order.owner());

            let removed_profile = self
                .owners_map
                .get_mut(&ob_key)
                .and_then(|m| m.get_mut(&owner_key))
                .and_then(|p| p.orders.shift_remove(&hash_key));

            if let Some(profile) = removed_profile {
                for handle in profile.take_orders {
                    self.arena.remove(handle);
                }
            }

            for out_idx in 0..order.num_outputs() {
                for in_idx in 0..order.num_inputs() {
                    let Some((sell_token, buy_token)) = order.io_tokens(out_idx, in_idx) else {
                        continue;
                    };
                    if sell_token == buy_token {
                        continue;
                    }
                    self.oi_pair_map
                        .remove(sg.orderbook, &hash_key, sell_token, buy_token);
                    self.io_pair_map
                        .remove(sg.orderbook, &hash_key, buy_token, sell_token);
                }
            }
        }
    }

    /// §4.4.1: a round returns a flat list drawn from every
    /// `(orderbook, owner)`, cycling each owner's flattened, active-only
    /// pairs list by their `limit`.
    pub fn get_next_round_orders(&mut self) -> Vec<PairHandle> {
        let mut result = Vec::new();
        for owners in self.owners_map.values_mut() {
            for profile in owners.values_mut() {
                let pairs: Vec<PairHandle> = profile
                    .orders
                    .values()
                    .filter(|o| o.active)
                    .flat_map(|o| o.take_orders.iter().copied())
                    .collect();
                let slice = next_owner_slice(&pairs, profile.limit, &mut profile.last_index);
                result.extend(slice);
            }
        }
        result
    }

    pub fn get_pair(&self, handle: PairHandle) -> Option<&Pair> {
        self.arena.get(handle)
    }

    /// Populates `pair.take_order.quote` from a chain read. The write
    /// path is the single place `quote` is mutated, and it goes through
    /// the arena, so every index observes the update (invariant 1/2).
    pub async fn quote_order(
        &mut self,
        handle: PairHandle,
        chain: &dyn ChainClient,
        block: Option<u64>,
    ) -> anyhow::Result<()> {
        let Some(pair) = self.arena.get(handle) else {
            return Ok(());
        };
        let raw = chain
            .read_contract(pair.orderbook, "quote2", Vec::new(), block)
            .await?;
        // `quote2` returns `(exists, outputMax: Float, ioRatio: Float)`;
        // the chain-client stub packs `outputMax || ioRatio` back to back
        // as two 32-byte packed floats for this core to decode.
        if raw.len() < 64 {
            return Ok(());
        }
        let max_output = PackedFloat::decode_hex(&format!("0x{}", alloy::hex::encode(&raw[0..32])))
            .map(|f| f.to_value())
            .unwrap_or_default();
        let ratio = PackedFloat::decode_hex(&format!("0x{}", alloy::hex::encode(&raw[32..64])))
            .map(|f| f.to_value())
            .unwrap_or_default();
        if let Some(pair) = self.arena.get_mut(handle) {
            pair.take_order.quote = Some(Quote { max_output, ratio });
        }
        Ok(())
    }

    /// Sets every owner's `limit` to the default except owners present in
    /// `owner_limits`.
    pub fn reset_limits(&mut self) {
        for owners in self.owners_map.values_mut() {
            for (owner_key, profile) in owners.iter_mut() {
                profile.limit = *self
                    .owner_limits
                    .get(owner_key)
                    .unwrap_or(&self.default_owner_limit);
            }
        }
    }

    pub async fn downscale_protection(&mut self, reset: bool, chain: &dyn ChainClient) {
        if reset {
            self.reset_limits();
        }
        downscale::run(
            &mut self.owners_map,
            &self.vault_map,
            &self.owner_limits,
            chain,
        )
        .await;
    }

    pub fn get_counterparty_orders(
        &mut self,
        handle: PairHandle,
        source: CounterpartySource,
    ) -> Vec<Vec<PairHandle>> {
        let Some(pair) = self.arena.get(handle) else {
            return Vec::new();
        };
        let (ob, sell, buy) = (pair.orderbook, pair.sell_token, pair.buy_token);
        self.oi_pair_map.sorted_list(ob, sell, buy, source, &self.arena)
    }

    /// For each intermediary token reachable from `pair.buy_token` in the
    /// output-to-input map that is also a configured base token (and is
    /// not `pair.sell_token`, which is the direct path), returns the
    /// descending intra-orderbook list from `buy_token -> t`.
    pub fn get_counterparty_orders_against_base_tokens(
        &mut self,
        handle: PairHandle,
        base_tokens: &std::collections::HashSet<Address>,
    ) -> HashMap<Address, Vec<PairHandle>> {
        let Some(pair) = self.arena.get(handle) else {
            return HashMap::new();
        };
        let (ob, buy_token, sell_token) = (pair.orderbook, pair.buy_token, pair.sell_token);
        let mut out = HashMap::new();
        for &t in base_tokens {
            if t == sell_token {
                continue;
            }
            let list = self
                .oi_pair_map
                .sorted_list(ob, buy_token, t, CounterpartySource::IntraOrderbook, &self.arena);
            if let Some(first) = list.into_iter().next() {
                if !first.is_empty() {
                    out.insert(t, first);
                }
            }
        }
        out
    }

    pub fn get_current_metadata(&self) -> ManagerMetadata {
        let mut md = ManagerMetadata::default();
        let mut distinct = std::collections::HashSet::new();
        for owners in self.owners_map.values() {
            md.total_owners += owners.len();
            for profile in owners.values() {
                md.total_orders += profile.orders.len();
                for order in profile.orders.values() {
                    md.total_pairs += order.take_orders.len();
                    for h in &order.take_orders {
                        if let Some(p) = self.arena.get(*h) {
                            distinct.insert((
                                normalize(p.sell_token),
                                normalize(p.buy_token),
                            ));
                        }
                    }
                }
            }
        }
        md.total_distinct_pairs = distinct.len();
        md
    }

    fn owner_limit_for(&self, owner: &Address) -> u32 {
        *self
            .owner_limits
            .get(&normalize(*owner))
            .unwrap_or(&self.default_owner_limit)
    }

    async fn resolve_token(
        &self,
        address: Address,
        sg: &SgOrder,
        chain: &dyn ChainClient,
    ) -> Result<Token, AddError> {
        if let Some(t) = self.watched_tokens.get(address) {
            return Ok(t);
        }
        if let Some(hint) = sg.token_hints.get(&address) {
            if let (Some(symbol), Some(decimals)) = (&hint.symbol, hint.decimals) {
                let token = Token {
                    address,
                    symbol: symbol.clone(),
                    decimals,
                };
                self.watched_tokens.insert(token.clone());
                return Ok(token);
            }
        }
        let decimals_raw = chain
            .read_contract(address, "decimals", Vec::new(), None)
            .await
            .map_err(|_| AddError::UndefinedDecimals(address))?;
        let decimals = *decimals_raw
            .first()
            .ok_or(AddError::UndefinedDecimals(address))?;
        let symbol_raw = chain
            .read_contract(address, "symbol", Vec::new(), None)
            .await
            .unwrap_or_default();
        let symbol = String::from_utf8_lossy(&symbol_raw).trim_matches(char::from(0)).to_string();
        let token = Token {
            address,
            symbol: if symbol.is_empty() { format!("{:#x}", address) } else { symbol },
            decimals,
        };
        self.watched_tokens.insert(token.clone());
        info!(token = %normalize(address), decimals, "resolved token via on-chain call");
        Ok(token)
    }

    /// Sets a vault's balance to the event's absolute value (§4.6: never a
    /// delta), creating the vault if this is the first time it is seen.
    pub fn set_vault_balance(
        &mut self,
        orderbook: Address,
        owner: Address,
        token: Address,
        vault_id_key: &str,
        balance: U256,
    ) {
        let vault = self
            .vault_map
            .entry(normalize(orderbook))
            .or_default()
            .entry(normalize(owner))
            .or_default()
            .entry(normalize(token))
            .or_default()
            .entry(vault_id_key.to_lowercase())
            .or_insert_with(|| Vault {
                id: U256::ZERO,
                token: Token {
                    address: token,
                    symbol: String::new(),
                    decimals: 18,
                },
                balance: U256::ZERO,
            });
        vault.balance = balance;
    }

    fn ensure_vault_placeholder(&mut self, orderbook: Address, owner: Address, token: Address) {
        self.vault_map
            .entry(normalize(orderbook))
            .or_default()
            .entry(normalize(owner))
            .or_default()
            .entry(normalize(token))
            .or_insert_with(|| Vault {
                id: U256::ZERO,
                token: Token {
                    address: token,
                    symbol: String::new(),
                    decimals: 18,
                },
                balance: U256::ZERO,
            });
    }

}

/// The per-owner slicing algorithm of §4.4.1. Reproduces the `last_index
/// %= N` clamp called out as open question 3, and caps the wrap-around
/// take at the number of pairs not already included in the first slice so
/// the "no pair appears twice within one round" guarantee holds even when
/// an owner has fewer pairs than their limit.
fn next_owner_slice(pairs: &[PairHandle], limit: u32, last_index: &mut u32) -> Vec<PairHandle> {
    let n = pairs.len();
    if n == 0 {
        *last_index = 0;
        return Vec::new();
    }
    let l = limit as usize;
    let start = (*last_index as usize) % n;
    let end = (start + l).min(n);
    let mut slice: Vec<PairHandle> = pairs[start..end].to_vec();
    let taken = slice.len();
    *last_index = (start + taken) as u32;

    if taken < l {
        let remaining = l - taken;
        let wrap_end = remaining.min(n.saturating_sub(taken));
        slice.extend_from_slice(&pairs[0..wrap_end]);
        *last_index = wrap_end as u32;
    }
    slice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::ChainClient;
    use async_trait::async_trait;

    struct StubChain;

    #[async_trait]
    impl ChainClient for StubChain {
        async fn read_contract(
            &self,
            _address: Address,
            fn_name: &str,
            _args: Vec<u8>,
            _block: Option<u64>,
        ) -> anyhow::Result<Vec<u8>> {
            match fn_name {
                "decimals" => Ok(vec![18]),
                "symbol" => Ok(b"TOK".to_vec()),
                _ => Ok(vec![0u8; 64]),
            }
        }

        async fn simulate_contract(
            &self,
            _address: Address,
            _data: Vec<u8>,
            _block: Option<u64>,
        ) -> anyhow::Result<crate::wallet::SimulationResult> {
            unimplemented!("not used by order_manager tests")
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
            token_hints: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn e1_add_then_remove_clears_indexes() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), HashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        let input = Address::repeat_byte(0x11);
        let output = Address::repeat_byte(0x22);
        let sg = make_sg_order(ob, "0xh", owner, input, output);

        mgr.add_order(&sg, &chain).await.unwrap();
        assert_eq!(mgr.oi_pair_map.handles_at(ob, output, input).len(), 1);
        assert_eq!(mgr.io_pair_map.handles_at(ob, input, output).len(), 1);
        assert_eq!(
            mgr.owners_map[&normalize(ob)][&normalize(owner)].orders.len(),
            1
        );

        mgr.remove_orders(&[sg]);
        assert!(mgr.oi_pair_map.handles_at(ob, output, input).is_empty());
        assert!(mgr.io_pair_map.handles_at(ob, input, output).is_empty());
        assert!(!mgr
            .owners_map
            .get(&normalize(ob))
            .map(|m| m.contains_key(&normalize(owner)) && !m[&normalize(owner)].orders.is_empty())
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn e2_multi_io_cross_product_is_in_deterministic_order() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), HashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        let in0 = Address::repeat_byte(0x01);
        let in1 = Address::repeat_byte(0x02);
        let out0 = Address::repeat_byte(0x03);
        let out1 = Address::repeat_byte(0x04);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(owner.as_slice());
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend_from_slice(Address::repeat_byte(0xE1).as_slice());
        bytes.extend_from_slice(Address::repeat_byte(0xE2).as_slice());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.push(2);
        for t in [in0, in1] {
            bytes.extend_from_slice(t.as_slice());
            bytes.push(18);
            bytes.extend_from_slice(&[0u8; 32]);
        }
        bytes.push(2);
        for t in [out0, out1] {
            bytes.extend_from_slice(t.as_slice());
            bytes.push(18);
            bytes.extend_from_slice(&[0u8; 32]);
        }
        let sg = SgOrder {
            orderbook: ob,
            hash: "0xh".to_string(),
            bytes,
            version: OrderVersion::V3,
            token_hints: HashMap::new(),
        };

        mgr.add_order(&sg, &chain).await.unwrap();
        let profile = &mgr.owners_map[&normalize(ob)][&normalize(owner)].orders["0xh"];
        assert_eq!(profile.take_orders.len(), 4);
        let pairs: Vec<_> = profile
            .take_orders
            .iter()
            .map(|h| mgr.arena.get(*h).unwrap())
            .collect();
        assert_eq!(pairs[0].sell_token, out0);
        assert_eq!(pairs[0].buy_token, in0);
        assert_eq!(pairs[1].sell_token, out0);
        assert_eq!(pairs[1].buy_token, in1);
        assert_eq!(pairs[2].sell_token, out1);
        assert_eq!(pairs[2].buy_token, in0);
        assert_eq!(pairs[3].sell_token, out1);
        assert_eq!(pairs[3].buy_token, in1);
    }

    #[tokio::test]
    async fn e3_rotation_with_limit_3_over_4_orders() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), HashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        for (i, h) in ["0xh1", "0xh2", "0xh3", "0xh4"].iter().enumerate() {
            let input = Address::repeat_byte(0x10 + i as u8);
            let output = Address::repeat_byte(0x20 + i as u8);
            let sg = make_sg_order(ob, h, owner, input, output);
            mgr.add_order(&sg, &chain).await.unwrap();
        }
        {
            let profile = mgr
                .owners_map
                .get_mut(&normalize(ob))
                .unwrap()
                .get_mut(&normalize(owner))
                .unwrap();
            profile.limit = 3;
        }

        let expected_hashes = [
            vec!["0xh1", "0xh2", "0xh3"],
            vec!["0xh4", "0xh1", "0xh2"],
            vec!["0xh3", "0xh4", "0xh1"],
            vec!["0xh2", "0xh3", "0xh4"],
        ];
        for expected in expected_hashes {
            let round = mgr.get_next_round_orders();
            let got: Vec<String> = round
                .iter()
                .map(|h| mgr.arena.get(*h).unwrap().take_order.id.clone())
                .collect();
            assert_eq!(got, expected);
        }
    }

    #[tokio::test]
    async fn e4_admin_override_is_sticky() {
        let mut overrides = HashMap::new();
        let admin = Address::repeat_byte(0xAD);
        overrides.insert(admin, 75u32);
        let mut mgr = OrderManager::new(TokenRegistry::new(), overrides);
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0c);

        let sg_admin = make_sg_order(
            ob,
            "0xa",
            admin,
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
        );
        let sg_owner = make_sg_order(
            ob,
            "0xb",
            owner,
            Address::repeat_byte(0x03),
            Address::repeat_byte(0x04),
        );
        mgr.add_order(&sg_admin, &chain).await.unwrap();
        mgr.add_order(&sg_owner, &chain).await.unwrap();

        mgr.reset_limits();

        assert_eq!(
            mgr.owners_map[&normalize(ob)][&normalize(admin)].limit,
            75
        );
        assert_eq!(
            mgr.owners_map[&normalize(ob)][&normalize(owner)].limit,
            DEFAULT_OWNER_LIMIT
        );
    }

    #[test]
    fn next_owner_slice_never_repeats_when_fewer_pairs_than_limit() {
        let mut arena = PairArena::new();
        let dummy = |sell: Address, buy: Address| crate::order::types::Pair {
            orderbook: Address::ZERO,
            buy_token: buy,
            buy_symbol: "B".into(),
            buy_decimals: 18,
            buy_vault_balance: U256::ZERO,
            sell_token: sell,
            sell_symbol: "S".into(),
            sell_decimals: 18,
            sell_vault_balance: U256::ZERO,
            take_order: TakeOrderDetails {
                id: "0x".into(),
                order: Order::V3 {
                    owner: Address::ZERO,
                    nonce: alloy::primitives::B256::ZERO,
                    evaluable: crate::order::types::Evaluable {
                        interpreter: Address::ZERO,
                        store: Address::ZERO,
                        bytecode: vec![],
                    },
                    valid_inputs: vec![],
                    valid_outputs: vec![],
                },
                input_io_index: 0,
                output_io_index: 0,
                signed_context: vec![],
                quote: None,
            },
        };
        let pairs = vec![
            arena.insert(dummy(Address::repeat_byte(1), Address::repeat_byte(2))),
            arena.insert(dummy(Address::repeat_byte(3), Address::repeat_byte(4))),
        ];
        let mut last_index = 0u32;
        let slice = next_owner_slice(&pairs, 5, &mut last_index);
        let mut seen = std::collections::HashSet::new();
        for h in &slice {
            assert!(seen.insert(format!("{:?}", h)));
        }
    }
}
