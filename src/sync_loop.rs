//! Sync Loop (C6)
//!
//! Drains one event batch from the indexer abstraction and dispatches
//! each event to the Order Manager in arrival order (§4.6). The indexer
//! is assumed at-least-once; every dispatch here is idempotent, so a
//! replayed transaction is harmless.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::indexer::{EventBatch, IndexerEvent};
use crate::order_manager::{OrderManager, SgOrder};
use crate::token::normalize;
use crate::wallet::ChainClient;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct OrderbookSyncStatus {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// `orderhash -> error snapshot`.
    pub failed_adds: HashMap<String, String>,
}

/// `source -> orderbook -> status`.
pub type SyncStatus = HashMap<String, HashMap<String, OrderbookSyncStatus>>;

/// The configured filter predicate `AddOrder` events are gated on (§4.6).
/// Receives the decoded record before it reaches `add_order`.
pub type OrderFilter = dyn Fn(&SgOrder) -> bool + Send + Sync;

/// Processes one drained batch. Transactions with no events are skipped;
/// events within a transaction are processed in the order the indexer
/// returned them.
pub async fn sync(
    manager: &mut OrderManager,
    batch: EventBatch,
    chain: &dyn ChainClient,
    filter: &OrderFilter,
) -> SyncStatus {
    let mut status: SyncStatus = HashMap::new();

    for (source, transactions) in batch {
        for tx in transactions {
            if tx.events.is_empty() {
                continue;
            }
            for event in tx.events {
                dispatch_event(manager, chain, filter, &source, &mut status, event).await;
            }
        }
    }
    status
}

async fn dispatch_event(
    manager: &mut OrderManager,
    chain: &dyn ChainClient,
    filter: &OrderFilter,
    source: &str,
    status: &mut SyncStatus,
    event: IndexerEvent,
) {
    match event {
        IndexerEvent::Deposit {
            orderbook,
            owner,
            token,
            vault_id,
            balance,
        }
        | IndexerEvent::Withdrawal {
            orderbook,
            owner,
            token,
            vault_id,
            balance,
        } => {
            manager.set_vault_balance(orderbook, owner, token, &vault_id, balance);
        }
        IndexerEvent::Clear { trades, .. } | IndexerEvent::TakeOrder { trades, .. } => {
            for change in trades {
                manager.set_vault_balance(
                    change.orderbook,
                    change.owner,
                    change.token,
                    &change.vault_id,
                    change.new_balance,
                );
            }
        }
        IndexerEvent::AddOrder {
            orderbook,
            hash,
            owner: _,
            active,
            bytes,
            version,
            token_hints,
        } => {
            if !active {
                return;
            }
            let sg = SgOrder {
                orderbook,
                hash: hash.clone(),
                bytes,
                version: version.into(),
                token_hints,
            };
            if !filter(&sg) {
                return;
            }
            let ob_status = status
                .entry(source.to_string())
                .or_default()
                .entry(normalize(orderbook))
                .or_default();
            match manager.add_order(&sg, chain).await {
                Ok(()) => ob_status.added.push(hash),
                Err(e) => {
                    warn!(hash = %hash, error = %e, "sync: add_order failed");
                    ob_status.failed_adds.insert(hash, e.to_string());
                }
            }
        }
        IndexerEvent::RemoveOrder {
            orderbook,
            hash,
            owner: _,
            active,
            bytes,
            version,
        } => {
            if active {
                return;
            }
            let sg = SgOrder {
                orderbook,
                hash: hash.clone(),
                bytes,
                version: version.into(),
                token_hints: HashMap::new(),
            };
            manager.remove_orders(std::slice::from_ref(&sg));
            status
                .entry(source.to_string())
                .or_default()
                .entry(normalize(orderbook))
                .or_default()
                .removed
                .push(hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::IndexerTransaction;
    use crate::order::decoder::OrderVersion;
    use crate::order_manager::OrderManager;
    use crate::token::TokenRegistry;
    use alloy::primitives::{Address, U256};
    use async_trait::async_trait;
    use chrono::Utc;
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

    fn order_bytes(owner: Address, input: Address, output: Address) -> Vec<u8> {
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
        bytes
    }

    fn accept_all(_: &SgOrder) -> bool {
        true
    }

    #[tokio::test]
    async fn deposit_sets_absolute_balance_and_add_order_is_recorded() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        let token = Address::repeat_byte(0x01);

        let mut batch = EventBatch::new();
        batch.insert(
            "source-a".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![
                    IndexerEvent::Deposit {
                        orderbook: ob,
                        owner,
                        token,
                        vault_id: "1".to_string(),
                        balance: U256::from(500u64),
                    },
                    IndexerEvent::AddOrder {
                        orderbook: ob,
                        hash: "0xabc".to_string(),
                        owner,
                        active: true,
                        bytes: order_bytes(owner, Address::repeat_byte(2), Address::repeat_byte(3)),
                        version: crate::indexer::OrderVersionTag::V3,
                        token_hints: StdHashMap::new(),
                    },
                ],
            }],
        );

        let status = sync(&mut mgr, batch, &chain, &accept_all).await;
        let md = mgr.get_current_metadata();
        assert_eq!(md.total_orders, 1);
        assert_eq!(
            status.get("source-a").unwrap().get(&normalize(ob)).unwrap().added,
            vec!["0xabc".to_string()]
        );
        let _ = OrderVersion::V3;
    }

    #[tokio::test]
    async fn inactive_add_order_event_is_ignored() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);

        let mut batch = EventBatch::new();
        batch.insert(
            "source-a".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![IndexerEvent::AddOrder {
                    orderbook: ob,
                    hash: "0xabc".to_string(),
                    owner,
                    active: false,
                    bytes: order_bytes(owner, Address::repeat_byte(2), Address::repeat_byte(3)),
                    version: crate::indexer::OrderVersionTag::V3,
                    token_hints: StdHashMap::new(),
                }],
            }],
        );

        let status = sync(&mut mgr, batch, &chain, &accept_all).await;
        assert_eq!(mgr.get_current_metadata().total_orders, 0);
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn empty_events_transaction_is_skipped() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;

        let mut batch = EventBatch::new();
        batch.insert(
            "source-a".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![],
            }],
        );

        let status = sync(&mut mgr, batch, &chain, &accept_all).await;
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn remove_order_event_with_active_false_removes_and_records() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);
        let sell = Address::repeat_byte(2);
        let buy = Address::repeat_byte(3);

        let mut add_batch = EventBatch::new();
        add_batch.insert(
            "s".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![IndexerEvent::AddOrder {
                    orderbook: ob,
                    hash: "0xabc".to_string(),
                    owner,
                    active: true,
                    bytes: order_bytes(owner, sell, buy),
                    version: crate::indexer::OrderVersionTag::V3,
                    token_hints: StdHashMap::new(),
                }],
            }],
        );
        sync(&mut mgr, add_batch, &chain, &accept_all).await;
        assert_eq!(mgr.get_current_metadata().total_orders, 1);

        let mut remove_batch = EventBatch::new();
        remove_batch.insert(
            "s".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![IndexerEvent::RemoveOrder {
                    orderbook: ob,
                    hash: "0xabc".to_string(),
                    owner,
                    active: false,
                    bytes: order_bytes(owner, sell, buy),
                    version: crate::indexer::OrderVersionTag::V3,
                }],
            }],
        );
        let status = sync(&mut mgr, remove_batch, &chain, &accept_all).await;
        assert_eq!(mgr.get_current_metadata().total_orders, 0);
        assert_eq!(
            status.get("s").unwrap().get(&normalize(ob)).unwrap().removed,
            vec!["0xabc".to_string()]
        );
    }

    #[tokio::test]
    async fn filter_predicate_rejects_order() {
        let mut mgr = OrderManager::new(TokenRegistry::new(), StdHashMap::new());
        let chain = StubChain;
        let ob = Address::repeat_byte(0x0b);
        let owner = Address::repeat_byte(0x0a);

        let mut batch = EventBatch::new();
        batch.insert(
            "s".to_string(),
            vec![IndexerTransaction {
                timestamp: Utc::now(),
                events: vec![IndexerEvent::AddOrder {
                    orderbook: ob,
                    hash: "0xabc".to_string(),
                    owner,
                    active: true,
                    bytes: order_bytes(owner, Address::repeat_byte(2), Address::repeat_byte(3)),
                    version: crate::indexer::OrderVersionTag::V3,
                    token_hints: StdHashMap::new(),
                }],
            }],
        );

        let reject_all = |_: &SgOrder| false;
        let status = sync(&mut mgr, batch, &chain, &reject_all).await;
        assert_eq!(mgr.get_current_metadata().total_orders, 0);
        assert!(status.is_empty());
    }
}
