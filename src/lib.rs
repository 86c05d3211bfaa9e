//! Orderbook Arbitrage Solver Core
//!
//! Watches a set of orderbook contracts, maintains the live order/vault
//! state, and on each round dry-runs external-liquidity fills against
//! the best available route, producing ready-to-sign transactions for
//! an external signer/broadcaster to execute.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

pub mod compiler;
pub mod config;
pub mod contracts;
pub mod counterparty;
pub mod downscale;
pub mod error;
pub mod fixed_float;
pub mod indexer;
pub mod order;
pub mod order_manager;
pub mod pair_index;
pub mod report;
pub mod round_runner;
pub mod router;
pub mod simulator;
pub mod sync_loop;
pub mod token;
pub mod wallet;

pub use config::{load_config, SolverConfig};
pub use error::{AddError, DecodeError, RouterError, SimError, SolverError};
pub use order_manager::{OrderManager, SgOrder};
pub use report::RoundReport;
pub use router::RouterFacade;
pub use simulator::{SimInput, SimOutput, Simulator};
pub use token::{Token, TokenRegistry};
pub use wallet::{AlloyChainClient, ChainClient};
