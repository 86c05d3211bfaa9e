//! Round Report (§7 propagation policy)
//!
//! Every non-fatal error a round produces is converted into a structured
//! span attribute here rather than raised; only `Fatal` errors are allowed
//! to propagate to the process boundary. `RoundReport` is the accumulator
//! a round hands to every pair-level task and emits once, as a single
//! tracing event, at the end of the round.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct RoundReport {
    pub round_number: u64,
    pub pairs_attempted: u64,
    pub opportunities_found: u64,
    /// `pair_hash.kind -> detail`, e.g. `"0xh.no_route_found" ->
    /// "aggregator,weighted_pool"`.
    pub attributes: HashMap<String, String>,
}

impl RoundReport {
    pub fn new(round_number: u64) -> Self {
        Self {
            round_number,
            ..Default::default()
        }
    }

    /// Records a non-fatal error as a span attribute; never propagates.
    pub fn record_error(&mut self, pair_hash: &str, kind: &str, detail: impl Into<String>) {
        self.attributes
            .insert(format!("{pair_hash}.{kind}"), detail.into());
    }

    pub fn record_opportunity(&mut self) {
        self.opportunities_found += 1;
    }

    pub fn record_attempt(&mut self) {
        self.pairs_attempted += 1;
    }

    /// Emits the whole round as one structured tracing event; the
    /// observer (an external collaborator, §1) consumes these.
    pub fn emit(&self) {
        info!(
            round = self.round_number,
            pairs_attempted = self.pairs_attempted,
            opportunities_found = self.opportunities_found,
            error_count = self.attributes.len(),
            "round complete"
        );
    }
}
