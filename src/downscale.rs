//! Downscale Protection (C5)
//!
//! Periodically recomputes per-owner round limits based on an owner's
//! share of orderbook liquidity per token: an owner who has spread
//! balance thinly across many vaults gets a smaller round budget,
//! bounding their share of simulation effort without dropping their
//! orders. The whole routine swallows RPC errors — the worst case is no
//! adjustment this cycle (§4.5 failure policy).
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order::types::{OwnerProfile, Vault};
use crate::token::normalize;
use crate::wallet::ChainClient;
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use tracing::debug;

/// `[0,25) -> 4, [25,50) -> 3, [50,75) -> 2, [75,inf) -> 1`.
fn bucket_divisor(ratio_pct: u64) -> u64 {
    match ratio_pct {
        0..=24 => 4,
        25..=49 => 3,
        50..=74 => 2,
        _ => 1,
    }
}

pub async fn run(
    owners_map: &mut HashMap<String, HashMap<String, OwnerProfile>>,
    vault_map: &HashMap<String, HashMap<String, HashMap<String, HashMap<String, Vault>>>>,
    owner_limits: &HashMap<String, u32>,
    chain: &dyn ChainClient,
) {
    let mut ob_balance_cache: HashMap<(String, String), U256> = HashMap::new();
    let mut divisors: HashMap<(String, String), Vec<u64>> = HashMap::new();

    for (ob_key, owners) in vault_map.iter() {
        let ob_addr: Address = match ob_key.parse() {
            Ok(a) => a,
            Err(_) => continue,
        };
        for (owner_key, tokens) in owners.iter() {
            if owner_limits.contains_key(owner_key) {
                continue;
            }
            for (token_key, vaults) in tokens.iter() {
                let token_addr: Address = match token_key.parse() {
                    Ok(a) => a,
                    Err(_) => continue,
                };
                let cache_key = (ob_key.clone(), token_key.clone());
                let ob_balance = match ob_balance_cache.get(&cache_key) {
                    Some(b) => *b,
                    None => match fetch_balance(chain, token_addr, ob_addr).await {
                        Some(b) => {
                            ob_balance_cache.insert(cache_key.clone(), b);
                            b
                        }
                        None => {
                            debug!(token = %token_key, orderbook = %ob_key, "downscale: balanceOf failed, skipping token");
                            continue;
                        }
                    },
                };

                let n_vaults = vaults.len() as u128;
                if n_vaults == 0 {
                    continue;
                }
                let owner_total: U256 = vaults.values().fold(U256::ZERO, |acc, v| acc + v.balance);
                let avg = owner_total / U256::from(n_vaults);
                let other_total = ob_balance.saturating_sub(owner_total);
                let ratio_pct: u64 = if other_total.is_zero() {
                    100
                } else {
                    let r = avg.saturating_mul(U256::from(100u64)) / other_total;
                    r.to_string().parse().unwrap_or(100)
                };
                divisors
                    .entry((ob_key.clone(), owner_key.clone()))
                    .or_default()
                    .push(bucket_divisor(ratio_pct));
            }
        }
    }

    for ((ob_key, owner_key), divs) in divisors {
        if divs.is_empty() {
            continue;
        }
        let avg_divisor = divs.iter().sum::<u64>() as f64 / divs.len() as f64;
        if let Some(profile) = owners_map.get_mut(&ob_key).and_then(|m| m.get_mut(&owner_key)) {
            let new_limit = ((profile.limit as f64 / avg_divisor).round() as i64).max(1) as u32;
            debug!(owner = %owner_key, old = profile.limit, new = new_limit, "downscale: limit recomputed");
            profile.limit = new_limit;
        }
    }
}

async fn fetch_balance(chain: &dyn ChainClient, token: Address, holder: Address) -> Option<U256> {
    let raw = chain
        .read_contract(token, "balanceOf", holder.as_slice().to_vec(), None)
        .await
        .ok()?;
    if raw.len() < 32 {
        return Some(U256::ZERO);
    }
    Some(U256::from_be_slice(&raw[raw.len() - 32..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_match_spec() {
        assert_eq!(bucket_divisor(0), 4);
        assert_eq!(bucket_divisor(24), 4);
        assert_eq!(bucket_divisor(25), 3);
        assert_eq!(bucket_divisor(49), 3);
        assert_eq!(bucket_divisor(50), 2);
        assert_eq!(bucket_divisor(74), 2);
        assert_eq!(bucket_divisor(75), 1);
        assert_eq!(bucket_divisor(1000), 1);
    }

    #[tokio::test]
    async fn every_owner_limit_after_run_is_at_least_one() {
        use crate::order::types::OwnerProfile;
        use crate::token::Token;
        use alloy::primitives::Address;
        use async_trait::async_trait;

        struct ZeroBalanceChain;
        #[async_trait]
        impl ChainClient for ZeroBalanceChain {
            async fn read_contract(
                &self,
                _address: Address,
                _fn_name: &str,
                _args: Vec<u8>,
                _block: Option<u64>,
            ) -> anyhow::Result<Vec<u8>> {
                Ok(vec![0u8; 32])
            }
            async fn simulate_contract(
                &self,
                _address: Address,
                _data: Vec<u8>,
                _block: Option<u64>,
            ) -> anyhow::Result<crate::wallet::SimulationResult> {
                unimplemented!()
            }
            async fn get_block_number(&self) -> anyhow::Result<u64> {
                Ok(1)
            }
        }

        let ob = normalize(Address::repeat_byte(1));
        let owner = normalize(Address::repeat_byte(2));
        let token = normalize(Address::repeat_byte(3));

        let mut owners_map = HashMap::new();
        let mut profile = OwnerProfile::new(1);
        profile.limit = 1;
        owners_map
            .entry(ob.clone())
            .or_insert_with(HashMap::new)
            .insert(owner.clone(), profile);

        let mut vault_map = HashMap::new();
        let mut vaults = HashMap::new();
        vaults.insert(
            "0".to_string(),
            Vault {
                id: U256::ZERO,
                token: Token {
                    address: Address::repeat_byte(3),
                    symbol: "T".into(),
                    decimals: 18,
                },
                balance: U256::from(1000u64),
            },
        );
        vault_map
            .entry(ob.clone())
            .or_insert_with(HashMap::new)
            .entry(owner.clone())
            .or_insert_with(HashMap::new)
            .insert(token, vaults);

        let owner_limits = HashMap::new();
        let chain = ZeroBalanceChain;
        run(&mut owners_map, &vault_map, &owner_limits, &chain).await;

        assert!(owners_map[&ob][&owner].limit >= 1);
    }
}
