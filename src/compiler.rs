//! Expression-Language Compiler (§1, §6.1, opaque)
//!
//! The real compiler (`compile(source) -> bytecode`) lives outside this
//! core; it is consumed only as the opaque function named in the spec.
//! This module provides that function signature plus the bounty-ensure
//! source builder the Trade Simulator needs (§4.8 steps 5/7/8), using a
//! deterministic stand-in encoding so the rest of the pipeline has
//! something concrete to call and test against.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::primitives::{Address, U256};

/// Builds the two-argument bounty-ensure source: asserts
/// `actual_bounty >= eth_price_18 * (gas_cost * coverage / 100) / 1e18`.
/// `gas_cost`/`coverage` of `(0, 0)` produce the always-true variant used
/// before the first dry-run has an estimate.
pub fn bounty_ensure_source(
    eth_price_18: U256,
    gas_cost: U256,
    coverage_pct: u64,
    signer: Address,
) -> String {
    format!(
        "ensure-bounty(eth-price-18:{eth_price_18} gas-cost:{gas_cost} coverage-pct:{coverage_pct} signer:{signer:#x})"
    )
}

/// Compiles `source` into bytecode. Opaque by design: this core never
/// interprets the expression language, it only forwards the source text
/// through a collaborator it does not implement. The stand-in here
/// returns the UTF-8 bytes of `source` so `compile` is total and
/// deterministic for testing; a real deployment swaps this module for a
/// binding to the actual compiler service.
pub fn compile(source: &str) -> Vec<u8> {
    source.as_bytes().to_vec()
}

/// §4.8 step 5: `gas_coverage_percentage == "0"` disables bounty
/// enforcement entirely and the bytecode collapses to empty calldata.
pub fn compile_bounty_bytecode(
    eth_price_18: U256,
    gas_cost: U256,
    coverage_pct_str: &str,
    signer: Address,
) -> Vec<u8> {
    if coverage_pct_str == "0" {
        return Vec::new();
    }
    let coverage_pct: u64 = coverage_pct_str.parse().unwrap_or(0);
    let source = bounty_ensure_source(eth_price_18, gas_cost, coverage_pct, signer);
    compile(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_coverage_disables_bytecode() {
        let bytecode = compile_bounty_bytecode(U256::from(1u64), U256::from(1u64), "0", Address::ZERO);
        assert!(bytecode.is_empty());
    }

    #[test]
    fn nonzero_coverage_produces_bytecode() {
        let bytecode =
            compile_bounty_bytecode(U256::from(1u64), U256::from(1u64), "100", Address::ZERO);
        assert!(!bytecode.is_empty());
    }

    #[test]
    fn compile_is_deterministic() {
        let source = bounty_ensure_source(U256::from(5u64), U256::from(10u64), 103, Address::ZERO);
        assert_eq!(compile(&source), compile(&source));
    }
}
