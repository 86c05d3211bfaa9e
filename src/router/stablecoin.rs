//! Stablecoin-Router Backend
//!
//! Trivial 1:1-peg backend used when both `from_token` and `to_token`
//! belong to a configured stablecoin set; never returns `NoRouteFound`
//! for a recognised pair. Named but left undetailed by the distilled
//! spec (§6 `StablecoinRouter`); grounded on the shared `Router` trait
//! contract and the aggregator backend's shape.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use super::{CachedRoute, MarketPrice, Quote, QuoteParams, QuoteStatus, Router, TradeParams};
use crate::error::RouterError;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashSet;

const ONE_E18: u64 = 1_000_000_000_000_000_000;

pub struct StablecoinRouter {
    stablecoins: HashSet<Address>,
}

impl StablecoinRouter {
    pub fn new(stablecoins: HashSet<Address>) -> Self {
        Self { stablecoins }
    }

    fn both_pegged(&self, params: &QuoteParams) -> bool {
        self.stablecoins.contains(&params.from_token) && self.stablecoins.contains(&params.to_token)
    }
}

#[async_trait]
impl Router for StablecoinRouter {
    fn name(&self) -> &'static str {
        "stablecoin"
    }

    async fn get_market_price(&self, params: &QuoteParams) -> Result<MarketPrice, RouterError> {
        if !self.both_pegged(params) {
            return Err(RouterError::NoRouteFound);
        }
        Ok(MarketPrice {
            price_18: U256::from(ONE_E18),
        })
    }

    async fn try_quote(&self, params: &QuoteParams) -> Result<Quote, RouterError> {
        if !self.both_pegged(params) {
            return Err(RouterError::NoRouteFound);
        }
        Ok(Quote {
            source: self.name(),
            status: QuoteStatus::Success,
            price_18: U256::from(ONE_E18),
            route: vec![params.from_token, params.to_token],
            amount_out: params.amount_in,
        })
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
            route_visual: format!("{:#x} -> {:#x}", params.from_token, params.to_token),
            take_orders_config_data: vec![],
            quote,
        })
    }

    async fn get_liquidity_providers_list(&self) -> Vec<&'static str> {
        vec!["stablecoin-peg"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(from: Address, to: Address) -> QuoteParams {
        QuoteParams {
            from_token: from,
            to_token: to,
            amount_in: U256::from(500u64),
            gas_price: None,
            block: None,
            sender: None,
            ignore_cache: false,
            sushi_route_type: None,
        }
    }

    #[tokio::test]
    async fn unrecognised_pair_yields_no_route_found() {
        let router = StablecoinRouter::new(HashSet::new());
        let err = router
            .try_quote(&params(Address::repeat_byte(1), Address::repeat_byte(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::NoRouteFound));
    }

    #[tokio::test]
    async fn pegged_pair_quotes_1to1() {
        let usdc = Address::repeat_byte(1);
        let usdt = Address::repeat_byte(2);
        let router = StablecoinRouter::new(HashSet::from([usdc, usdt]));
        let quote = router.try_quote(&params(usdc, usdt)).await.unwrap();
        assert_eq!(quote.price_18, U256::from(ONE_E18));
        assert_eq!(quote.amount_out, U256::from(500u64));
    }
}
