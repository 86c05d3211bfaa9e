//! Indexer Event Stream (§6.2, opaque)
//!
//! The solver is agnostic to transport: it only needs
//! `get_upstream_events()` to return, per source URL, a list of
//! transactions each carrying a timestamp and a list of discriminated
//! events. This module defines that contract and a thin `reqwest`-backed
//! default; production indexers are an external collaborator out of
//! scope for this core.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order_manager::TokenHint;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// `__typename` discriminator (§6.2).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum IndexerEvent {
    Deposit {
        orderbook: Address,
        owner: Address,
        token: Address,
        vault_id: String,
        balance: U256,
    },
    Withdrawal {
        orderbook: Address,
        owner: Address,
        token: Address,
        vault_id: String,
        balance: U256,
    },
    Clear {
        orderbook: Address,
        trades: Vec<BalanceChange>,
    },
    TakeOrder {
        orderbook: Address,
        trades: Vec<BalanceChange>,
    },
    AddOrder {
        orderbook: Address,
        hash: String,
        owner: Address,
        active: bool,
        bytes: Vec<u8>,
        version: OrderVersionTag,
        #[serde(default)]
        token_hints: HashMap<Address, TokenHint>,
    },
    RemoveOrder {
        orderbook: Address,
        hash: String,
        owner: Address,
        active: bool,
        bytes: Vec<u8>,
        version: OrderVersionTag,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub enum OrderVersionTag {
    V3,
    V5,
}

impl From<OrderVersionTag> for crate::order::decoder::OrderVersion {
    fn from(t: OrderVersionTag) -> Self {
        match t {
            OrderVersionTag::V3 => crate::order::decoder::OrderVersion::V3,
            OrderVersionTag::V5 => crate::order::decoder::OrderVersion::V5,
        }
    }
}

/// One leg of a `Clear`/`TakeOrder` event: the vault whose balance
/// changed and its new absolute balance (never a delta, §4.6).
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceChange {
    pub orderbook: Address,
    pub owner: Address,
    pub token: Address,
    pub vault_id: String,
    pub new_balance: U256,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerTransaction {
    pub timestamp: DateTime<Utc>,
    pub events: Vec<IndexerEvent>,
}

/// `source URL -> transactions`.
pub type EventBatch = HashMap<String, Vec<IndexerTransaction>>;

#[async_trait]
pub trait IndexerClient: Send + Sync {
    async fn get_upstream_events(&self) -> anyhow::Result<EventBatch>;
}

/// A thin `reqwest`-based default: polls every configured source URL and
/// expects each to return a JSON array of [`IndexerTransaction`]. Real
/// indexer semantics (pagination, cursoring, auth) are out of scope.
pub struct HttpIndexerClient {
    client: reqwest::Client,
    sources: Vec<String>,
}

impl HttpIndexerClient {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            sources,
        }
    }
}

#[async_trait]
impl IndexerClient for HttpIndexerClient {
    async fn get_upstream_events(&self) -> anyhow::Result<EventBatch> {
        let mut batch = EventBatch::new();
        for source in &self.sources {
            let txs: Vec<IndexerTransaction> = self
                .client
                .get(source)
                .send()
                .await?
                .json()
                .await
                .unwrap_or_default();
            batch.insert(source.clone(), txs);
        }
        Ok(batch)
    }
}
