//! Pair Index (C3)
//!
//! Two symmetric nested maps (output-to-input and its mirror) giving O(1)
//! lookup of counterparties, plus a descending sort operation whose result
//! is written back into the map so repeat calls see an already-sorted
//! view.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order_manager::arena::{PairArena, PairHandle};
use crate::token::normalize;
use alloy::primitives::Address;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Which list `sorted_list` should produce (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterpartySource {
    IntraOrderbook,
    InterOrderbook,
}

/// `orderbook -> output -> input -> orderhash -> handle`, one of the two
/// symmetric directions (`oi_pair_map` or `io_pair_map` depending on which
/// axis the caller assigns to "output"/"input").
#[derive(Default)]
pub struct PairIndex {
    map: HashMap<String, HashMap<String, HashMap<String, IndexMap<String, PairHandle>>>>,
}

impl PairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts into the 4-level nested mapping, creating missing levels.
    pub fn add(
        &mut self,
        orderbook: Address,
        hash: &str,
        output: Address,
        input: Address,
        handle: PairHandle,
    ) {
        self.map
            .entry(normalize(orderbook))
            .or_default()
            .entry(normalize(output))
            .or_default()
            .entry(normalize(input))
            .or_default()
            .insert(hash.to_lowercase(), handle);
    }

    /// Deletes the order; deletes parent levels when empty, but never
    /// deletes the orderbook level.
    pub fn remove(&mut self, orderbook: Address, hash: &str, output: Address, input: Address) {
        let ob_key = normalize(orderbook);
        let Some(ob_map) = self.map.get_mut(&ob_key) else {
            return;
        };
        let out_key = normalize(output);
        let Some(out_map) = ob_map.get_mut(&out_key) else {
            return;
        };
        let in_key = normalize(input);
        if let Some(in_map) = out_map.get_mut(&in_key) {
            in_map.shift_remove(&hash.to_lowercase());
            if in_map.is_empty() {
                out_map.remove(&in_key);
            }
        }
        if out_map.is_empty() {
            ob_map.remove(&out_key);
        }
        // The orderbook level is intentionally never removed, even if it
        // becomes empty: a known orderbook should keep resolving to an
        // (empty) entry rather than disappearing from the map.
    }

    /// `pair_map[orderbook][output][input]`, in whatever order it is
    /// currently stored (callers wanting a ranked view use `sorted_list`).
    pub fn handles_at(&self, orderbook: Address, output: Address, input: Address) -> Vec<PairHandle> {
        self.map
            .get(&normalize(orderbook))
            .and_then(|m| m.get(&normalize(output)))
            .and_then(|m| m.get(&normalize(input)))
            .map(|m| m.values().copied().collect())
            .unwrap_or_default()
    }

    /// Returns a descending view per §4.3's comparator, sorted in place so
    /// the underlying mapping is left in ranked order for the next call.
    ///
    /// `IntraOrderbook` draws one list from `pair_map[orderbook][output]
    /// [input]`. `InterOrderbook` draws a list of lists, one per *other*
    /// orderbook present in the map that also has an entry for
    /// `[output][input]`.
    pub fn sorted_list(
        &mut self,
        orderbook: Address,
        output: Address,
        input: Address,
        source: CounterpartySource,
        arena: &PairArena,
    ) -> Vec<Vec<PairHandle>> {
        match source {
            CounterpartySource::IntraOrderbook => {
                vec![self.sort_one(&normalize(orderbook), output, input, arena)]
            }
            CounterpartySource::InterOrderbook => {
                let ob_key = normalize(orderbook);
                let other_obs: Vec<String> = self
                    .map
                    .keys()
                    .filter(|k| **k != ob_key)
                    .cloned()
                    .collect();
                other_obs
                    .into_iter()
                    .map(|ob| self.sort_one(&ob, output, input, arena))
                    .filter(|l| !l.is_empty())
                    .collect()
            }
        }
    }

    fn sort_one(
        &mut self,
        ob_key: &str,
        output: Address,
        input: Address,
        arena: &PairArena,
    ) -> Vec<PairHandle> {
        let Some(in_map) = self
            .map
            .get_mut(ob_key)
            .and_then(|m| m.get_mut(&normalize(output)))
            .and_then(|m| m.get_mut(&normalize(input)))
        else {
            return Vec::new();
        };

        in_map.sort_by(|_, a, _, b| compare_handles(*a, *b, arena));
        in_map.values().copied().collect()
    }
}

/// Descending comparator: ascending `ratio` first (smaller ratio is a
/// better price for the taker), then descending `max_output`; a pair with
/// no quote yet sorts last at both levels.
fn compare_handles(a: PairHandle, b: PairHandle, arena: &PairArena) -> Ordering {
    let qa = arena.get(a).and_then(|p| p.take_order.quote);
    let qb = arena.get(b).and_then(|p| p.take_order.quote);
    match (qa, qb) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(qa), Some(qb)) => qa
            .ratio
            .cmp(&qb.ratio)
            .then_with(|| qb.max_output.cmp(&qa.max_output)),
    }
}
