//! Data Model
//!
//! The structures of §3: tokens, vaults, the tagged V3/V5 order union,
//! and the `Pair` / `OwnerProfile` records the Order Manager indexes.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order_manager::arena::PairHandle;
use crate::token::Token;
use alloy::primitives::{Address, B256, U256};
use indexmap::IndexMap;

/// Evaluable bytecode bundle shared by both order versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluable {
    pub interpreter: Address,
    pub store: Address,
    pub bytecode: Vec<u8>,
}

/// `valid_inputs`/`valid_outputs` entry for a V3 order: decimals travel
/// with the IO record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoV3 {
    pub token: Address,
    pub decimals: u8,
    pub vault_id: U256,
}

/// `valid_inputs`/`valid_outputs` entry for a V5 order: decimals come from
/// the token registry instead, and the vault id is a 32-byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoV5 {
    pub token: Address,
    pub vault_id: B256,
}

/// The closed sum type of §9's design note: V3 vs V5 is a tagged union,
/// not runtime polymorphism. Both variants share the `owner/nonce/
/// evaluable` prefix; IO shape and vault-id type differ because the
/// on-chain ABIs differ and must be preserved precisely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    V3 {
        owner: Address,
        nonce: B256,
        evaluable: Evaluable,
        valid_inputs: Vec<IoV3>,
        valid_outputs: Vec<IoV3>,
    },
    V5 {
        owner: Address,
        nonce: B256,
        evaluable: Evaluable,
        valid_inputs: Vec<IoV5>,
        valid_outputs: Vec<IoV5>,
    },
}

impl Order {
    pub fn owner(&self) -> Address {
        match self {
            Order::V3 { owner, .. } | Order::V5 { owner, .. } => *owner,
        }
    }

    pub fn nonce(&self) -> B256 {
        match self {
            Order::V3 { nonce, .. } | Order::V5 { nonce, .. } => *nonce,
        }
    }

    pub fn num_inputs(&self) -> usize {
        match self {
            Order::V3 { valid_inputs, .. } => valid_inputs.len(),
            Order::V5 { valid_inputs, .. } => valid_inputs.len(),
        }
    }

    pub fn num_outputs(&self) -> usize {
        match self {
            Order::V3 { valid_outputs, .. } => valid_outputs.len(),
            Order::V5 { valid_outputs, .. } => valid_outputs.len(),
        }
    }

    /// Resolves the token address at an (output, input) index pair,
    /// returning `None` if out of range.
    pub fn io_tokens(&self, output_idx: usize, input_idx: usize) -> Option<(Address, Address)> {
        match self {
            Order::V3 {
                valid_inputs,
                valid_outputs,
                ..
            } => Some((
                valid_outputs.get(output_idx)?.token,
                valid_inputs.get(input_idx)?.token,
            )),
            Order::V5 {
                valid_inputs,
                valid_outputs,
                ..
            } => Some((
                valid_outputs.get(output_idx)?.token,
                valid_inputs.get(input_idx)?.token,
            )),
        }
    }
}

/// A vault is identified by `(orderbook, owner, token.address, id)` and is
/// append-only: balance is overwritten on each sync event, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub id: U256,
    pub token: Token,
    pub balance: U256,
}

/// The live on-chain quote for one `Pair`, populated by `quote_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub max_output: U256,
    pub ratio: U256,
}

/// Everything `Arb.arb3`/`arb4` and `Orderbook.clear3` need to reference a
/// specific order leg.
#[derive(Debug, Clone)]
pub struct TakeOrderDetails {
    pub id: String,
    pub order: Order,
    pub input_io_index: usize,
    pub output_io_index: usize,
    pub signed_context: Vec<Vec<u8>>,
    pub quote: Option<Quote>,
}

/// What the solver actually trades on: one `(sell_token, buy_token)` leg of
/// a specific order. The `take_order` field is the shared-identity object
/// named by invariant 1 — mutating `quote` through one index must be
/// visible through every other index. That guarantee is structural here:
/// every index stores a [`PairHandle`] into the arena, never a `Pair`
/// value, so there is exactly one copy of this struct per handle.
#[derive(Debug, Clone)]
pub struct Pair {
    pub orderbook: Address,
    pub buy_token: Address,
    pub buy_symbol: String,
    pub buy_decimals: u8,
    pub buy_vault_balance: U256,
    pub sell_token: Address,
    pub sell_symbol: String,
    pub sell_decimals: u8,
    pub sell_vault_balance: U256,
    pub take_order: TakeOrderDetails,
}

impl Pair {
    pub fn quote_ratio(&self) -> Option<U256> {
        self.take_order.quote.map(|q| q.ratio)
    }

    pub fn quote_max_output(&self) -> Option<U256> {
        self.take_order.quote.map(|q| q.max_output)
    }
}

/// `{active, order, take_orders}` — `take_orders` is the fanned-out cross
/// product of inputs x outputs with same-token rows elided, held as arena
/// handles so the profile and the pair maps observe the same `Pair`s.
#[derive(Debug, Clone)]
pub struct OrderProfile {
    pub active: bool,
    pub order: Order,
    pub take_orders: Vec<PairHandle>,
}

/// `{limit, last_index, orders}`. `orders` is insertion-order preserving
/// (`IndexMap`) because the round scheduler's determinism (E3) depends on
/// a stable flattened pairs list.
#[derive(Debug, Clone)]
pub struct OwnerProfile {
    pub limit: u32,
    pub last_index: u32,
    pub orders: IndexMap<String, OrderProfile>,
}

impl OwnerProfile {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            last_index: 0,
            orders: IndexMap::new(),
        }
    }
}
