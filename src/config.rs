//! Configuration
//!
//! Loads `SolverConfig` from environment variables via `dotenv` +
//! `std::env::var`, in the teacher's `load_config()` style: every field is
//! required unless given a fallback, and parse failures are wrapped with
//! `.context(...)` rather than left as a bare parse error. Carries the
//! tunables of spec §6.4.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::primitives::Address;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::time::Duration;

/// `route ∈ {single, multi}` (§6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Single,
    Multi,
}

impl FromStr for RouteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(RouteMode::Single),
            "multi" => Ok(RouteMode::Multi),
            other => anyhow::bail!("ROUTE must be 'single' or 'multi', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub orderbooks: Vec<Address>,
    pub arb_contract: Address,
    pub signer_address: Address,
    pub indexer_sources: Vec<String>,
    pub base_tokens: HashSet<Address>,
    pub stablecoins: HashSet<Address>,

    // §6.4 tunables
    pub quote_gas: u64,
    pub owner_limits: HashMap<Address, u32>,
    pub gas_coverage_percentage: String,
    pub gas_limit_multiplier: f64,
    pub gas_price_multiplier: f64,
    pub max_ratio: bool,
    pub route: RouteMode,
    pub timeout: Duration,
    pub route_time: Duration,
    pub default_owner_limit: u32,

    // Reactor knobs (§5), not named in §6.4 but required to drive it.
    pub max_concurrent_simulations: usize,
    pub round_interval: Duration,
}

pub fn load_config() -> Result<SolverConfig> {
    dotenv::dotenv().ok();

    let orderbooks = parse_address_list(&env_var("ORDERBOOKS")?)
        .context("ORDERBOOKS must be a comma-separated address list")?;
    let indexer_sources = std::env::var("INDEXER_SOURCES")
        .context("INDEXER_SOURCES not set")?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let base_tokens = parse_address_list(&env_var("BASE_TOKENS").unwrap_or_default())
        .unwrap_or_default()
        .into_iter()
        .collect();
    let stablecoins = parse_address_list(&env_var("STABLECOINS").unwrap_or_default())
        .unwrap_or_default()
        .into_iter()
        .collect();
    let owner_limits = parse_owner_limits(&env_var("OWNER_LIMITS").unwrap_or_default())?;

    Ok(SolverConfig {
        rpc_url: env_var("RPC_URL")?,
        chain_id: env_var("CHAIN_ID")?.parse().context("CHAIN_ID must be a u64")?,
        orderbooks,
        arb_contract: Address::from_str(&env_var("ARB_CONTRACT")?)
            .context("ARB_CONTRACT is not a valid address")?,
        signer_address: Address::from_str(&env_var("SIGNER_ADDRESS")?)
            .context("SIGNER_ADDRESS is not a valid address")?,
        indexer_sources,
        base_tokens,
        stablecoins,

        quote_gas: env_var_or("QUOTE_GAS", "1000000").parse().context("QUOTE_GAS must be a u64")?,
        owner_limits,
        gas_coverage_percentage: env_var_or("GAS_COVERAGE_PERCENTAGE", "100"),
        gas_limit_multiplier: env_var_or("GAS_LIMIT_MULTIPLIER", "1.2")
            .parse()
            .context("GAS_LIMIT_MULTIPLIER must be a float")?,
        gas_price_multiplier: env_var_or("GAS_PRICE_MULTIPLIER", "1.0")
            .parse()
            .context("GAS_PRICE_MULTIPLIER must be a float")?,
        max_ratio: env_var_or("MAX_RATIO", "false")
            .parse()
            .context("MAX_RATIO must be true/false")?,
        route: env_var_or("ROUTE", "single").parse()?,
        timeout: Duration::from_millis(
            env_var_or("TIMEOUT_MS", "10000").parse().context("TIMEOUT_MS must be a u64")?,
        ),
        route_time: Duration::from_millis(
            env_var_or("ROUTE_TIME_MS", "300000")
                .parse()
                .context("ROUTE_TIME_MS must be a u64")?,
        ),
        default_owner_limit: env_var_or("DEFAULT_OWNER_LIMIT", "25")
            .parse()
            .context("DEFAULT_OWNER_LIMIT must be a u32")?,

        max_concurrent_simulations: env_var_or("MAX_CONCURRENT_SIMULATIONS", "8")
            .parse()
            .context("MAX_CONCURRENT_SIMULATIONS must be a usize")?,
        round_interval: Duration::from_millis(
            env_var_or("ROUND_INTERVAL_MS", "5000")
                .parse()
                .context("ROUND_INTERVAL_MS must be a u64")?,
        ),
    })
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} not set"))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_address_list(s: &str) -> Result<Vec<Address>> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Address::from_str(s).with_context(|| format!("invalid address: {s}")))
        .collect()
}

/// `ADDR:LIMIT,ADDR:LIMIT,...`, the admin-supplied overrides exempt from
/// dynamic downscaling (§3 `owner_limits`).
fn parse_owner_limits(s: &str) -> Result<HashMap<Address, u32>> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(2, ':');
            let addr = parts
                .next()
                .ok_or_else(|| anyhow::anyhow!("missing address in owner limit entry '{entry}'"))?;
            let limit = parts
                .next()
                .ok_or_else(|| anyhow::anyhow!("missing limit in owner limit entry '{entry}'"))?;
            Ok((
                Address::from_str(addr).with_context(|| format!("invalid owner address: {addr}"))?,
                limit.parse().with_context(|| format!("invalid owner limit: {limit}"))?,
            ))
        })
        .collect()
}
