//! Aggregator-Router Backend
//!
//! Consults a pool-code map prefetched by an external data-fetcher and
//! runs an off-chain best-route search; returns `NoWay` if the search
//! yields nothing. Caches by `(from, to)` address pair.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use super::cache::{CachedEntry, RouteCache};
use super::{CachedRoute, MarketPrice, Quote, QuoteParams, QuoteStatus, Router, TradeParams};
use crate::error::RouterError;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// A minimal pool-code map: `(token_a, token_b) -> pools that connect
/// them`, in practice prefetched by an external data-fetcher out of
/// scope here.
pub type PoolCodeMap = HashMap<(Address, Address), Vec<Address>>;

pub struct AggregatorRouter {
    pool_codes: PoolCodeMap,
    cache: Mutex<RouteCache<Quote>>,
}

impl AggregatorRouter {
    pub fn new(pool_codes: PoolCodeMap) -> Self {
        Self {
            pool_codes,
            cache: Mutex::new(RouteCache::new()),
        }
    }

    /// The off-chain best-route search: a direct path if one is known,
    /// otherwise no route.
    fn search_route(&self, from: Address, to: Address) -> Option<Vec<Address>> {
        self.pool_codes.get(&(from, to)).cloned()
    }
}

#[async_trait]
impl Router for AggregatorRouter {
    fn name(&self) -> &'static str {
        "aggregator"
    }

    async fn get_market_price(&self, params: &QuoteParams) -> Result<MarketPrice, RouterError> {
        let quote = self.try_quote(params).await?;
        Ok(MarketPrice {
            price_18: quote.price_18,
        })
    }

    async fn try_quote(&self, params: &QuoteParams) -> Result<Quote, RouterError> {
        if !params.ignore_cache {
            if let Some(entry) = self.cache.lock().unwrap().get(params.from_token, params.to_token) {
                return match entry {
                    CachedEntry::Positive { value, .. } => Ok(value),
                    CachedEntry::NoWay { .. } => Err(RouterError::NoRouteFound),
                };
            }
        }

        let Some(route) = self.search_route(params.from_token, params.to_token) else {
            self.cache
                .lock()
                .unwrap()
                .put_no_way(params.from_token, params.to_token, DEFAULT_TTL);
            return Err(RouterError::NoRouteFound);
        };

        let amount_out = params.amount_in; // 1:1 off-chain search model, no slippage simulated here
        let quote = Quote {
            source: self.name(),
            status: QuoteStatus::Success,
            price_18: U256::from(10u64).pow(U256::from(18u64)),
            route,
            amount_out,
        };
        self.cache.lock().unwrap().put_positive(
            params.from_token,
            params.to_token,
            quote.clone(),
            DEFAULT_TTL,
        );
        Ok(quote)
    }

    async fn find_best_route(&self, params: &QuoteParams) -> Result<CachedRoute, RouterError> {
        let quote = self.try_quote(params).await?;
        Ok(CachedRoute {
            quote,
            valid_until_unix_ms: 0,
        })
    }

    async fn get_trade_params(&self, params: &QuoteParams) -> Result<TradeParams, RouterError> {
        let quote = self.try_quote(params).await?;
        Ok(TradeParams {
            source: self.name(),
            route_visual: quote
                .route
                .iter()
                .map(|a| format!("{:#x}", a))
                .collect::<Vec<_>>()
                .join(" -> "),
            take_orders_config_data: quote
                .route
                .iter()
                .flat_map(|a| a.as_slice().to_vec())
                .collect(),
            quote,
        })
    }

    async fn get_liquidity_providers_list(&self) -> Vec<&'static str> {
        vec!["aggregator"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(from: Address, to: Address) -> QuoteParams {
        QuoteParams {
            from_token: from,
            to_token: to,
            amount_in: U256::from(1_000u64),
            gas_price: None,
            block: None,
            sender: None,
            ignore_cache: false,
            sushi_route_type: None,
        }
    }

    #[tokio::test]
    async fn unknown_pair_returns_no_route_found() {
        let router = AggregatorRouter::new(PoolCodeMap::new());
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let err = router.try_quote(&params(from, to)).await.unwrap_err();
        assert!(matches!(err, RouterError::NoRouteFound));
    }

    #[tokio::test]
    async fn known_pair_returns_success() {
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let mut map = PoolCodeMap::new();
        map.insert((from, to), vec![Address::repeat_byte(9)]);
        let router = AggregatorRouter::new(map);
        let quote = router.try_quote(&params(from, to)).await.unwrap();
        assert_eq!(quote.status, QuoteStatus::Success);
    }
}
