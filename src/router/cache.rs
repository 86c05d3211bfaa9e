//! Per-Backend TTL Route Cache
//!
//! Grounded in the teacher's `arbitrage/cooldown.rs` escalating-state
//! `HashMap<Key, Entry>` pattern. Negative (`NoWay`) entries are cached
//! explicitly — an absent entry and a cached negative must be
//! distinguishable, otherwise every round re-hits an empty upstream API
//! (§9 design note).
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::primitives::Address;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum CachedEntry<T: Clone> {
    Positive { value: T, valid_until: Instant },
    NoWay { valid_until: Instant },
}

#[derive(Default)]
pub struct RouteCache<T: Clone> {
    entries: HashMap<(Address, Address), CachedEntry<T>>,
}

impl<T: Clone> RouteCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, from: Address, to: Address) -> Option<CachedEntry<T>> {
        let entry = self.entries.get(&(from, to))?;
        let valid_until = match entry {
            CachedEntry::Positive { valid_until, .. } => *valid_until,
            CachedEntry::NoWay { valid_until } => *valid_until,
        };
        if Instant::now() > valid_until {
            None
        } else {
            Some(entry.clone())
        }
    }

    pub fn put_positive(&mut self, from: Address, to: Address, value: T, ttl: Duration) {
        self.entries.insert(
            (from, to),
            CachedEntry::Positive {
                value,
                valid_until: Instant::now() + ttl,
            },
        );
    }

    pub fn put_no_way(&mut self, from: Address, to: Address, ttl: Duration) {
        self.entries.insert(
            (from, to),
            CachedEntry::NoWay {
                valid_until: Instant::now() + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn positive_entry_expires_after_ttl() {
        let mut cache: RouteCache<u32> = RouteCache::new();
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        cache.put_positive(from, to, 42, Duration::from_millis(10));
        assert!(matches!(cache.get(from, to), Some(CachedEntry::Positive { value: 42, .. })));
        sleep(Duration::from_millis(20));
        assert!(cache.get(from, to).is_none());
    }

    #[test]
    fn no_way_is_distinguishable_from_absent() {
        let mut cache: RouteCache<u32> = RouteCache::new();
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        assert!(cache.get(from, to).is_none());
        cache.put_no_way(from, to, Duration::from_secs(60));
        assert!(matches!(cache.get(from, to), Some(CachedEntry::NoWay { .. })));
    }
}
