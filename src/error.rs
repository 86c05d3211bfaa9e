//! Error Kinds
//!
//! The kinds named by the design: non-fatal kinds are recorded on a round's
//! report and never stop the reactor; `Fatal` is the only kind that should
//! propagate to the process boundary.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::primitives::Address;
use thiserror::Error;

/// Top-level error kind. Every non-fatal variant is recorded as a span
/// attribute on the owning round's [`crate::report::RoundReport`] rather
/// than raised; `Fatal` is allowed to bubble out via `anyhow`.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("token {0} has undefined decimals")]
    UndefinedDecimals(Address),

    #[error("no route found for {from} -> {to}")]
    NoRouteFound { from: Address, to: Address },

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("order ratio {order_ratio} greater than market price {market_price}")]
    OrderRatioGreaterThanMarketPrice {
        order_ratio: alloy::primitives::U256,
        market_price: alloy::primitives::U256,
    },

    #[error("no opportunity at stage {stage}: {reason}")]
    NoOpportunity { stage: u8, reason: String },

    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    #[error("fatal: {0}")]
    Fatal(String),
}

/// Order-decode failures (C2). Dropping the single order and continuing is
/// the caller's responsibility, not this type's.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("order bytes are malformed: {0}")]
    MalformedOrder(String),

    #[error("invalid packed float: {0}")]
    InvalidFloat(String),

    #[error("unrecognized order version tag")]
    UnknownVersion,
}

/// `add_order` failures (C4 §4.4).
#[derive(Debug, Error)]
pub enum AddError {
    #[error(transparent)]
    DecodeFailed(#[from] DecodeError),

    #[error("token {0} has undefined decimals")]
    UndefinedDecimals(Address),

    #[error("float decode failed: {0}")]
    FloatDecodeFailed(String),
}

/// Router-backend failures (C7).
#[derive(Debug, Error, Clone)]
pub enum RouterError {
    #[error("no route found")]
    NoRouteFound,

    #[error("upstream fetch failed: {0}")]
    FetchFailed(String),

    #[error("request timed out")]
    Timeout,
}

/// Trade-simulator failures (C8).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("order ratio {order_ratio} greater than market price {market_price}")]
    OrderRatioGreaterThanMarketPrice {
        order_ratio: alloy::primitives::U256,
        market_price: alloy::primitives::U256,
    },

    #[error("no opportunity at stage {stage}: {reason}")]
    NoOpportunity { stage: u8, reason: String },

    #[error("route encoding failed: {0}")]
    RouteEncodingFailed(String),

    #[error("compiler failure: {0}")]
    CompilerFailure(String),

    #[error(transparent)]
    Router(#[from] RouterError),
}
