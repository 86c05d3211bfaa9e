//! Watched-Token Registry
//!
//! Interns `Token` records per-process so decimals/symbol lookups don't
//! repeatedly hit the chain. Read-mostly, written on first sight of a
//! token; backed by `DashMap` the way the teacher's pool-state manager
//! caches per-address state, since simulation tasks read this
//! concurrently while only the sync path writes to it.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;

/// `{address, symbol, decimals}`, interned per-process (§3 Data Model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// All identifiers are case-normalized to lowercase on ingest (§3);
/// addresses compare byte-exact on their lowercase hex form.
pub fn normalize(addr: Address) -> String {
    format!("{:#x}", addr)
}

#[derive(Clone)]
pub struct TokenRegistry {
    inner: Arc<DashMap<String, Token>>,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: Address) -> Option<Token> {
        self.inner.get(&normalize(addr)).map(|e| e.value().clone())
    }

    pub fn insert(&self, token: Token) {
        self.inner.insert(normalize(token.address), token);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
