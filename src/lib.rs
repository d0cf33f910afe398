//! Client SDK for a bonding-curve token market on Aptos.
//!
//! Reads pool reserves from chain, quotes buys and sells on the curve, submits
//! `bonding::buy` / `bonding::sell` through a caller-supplied [`chain::Signer`],
//! and records completed trades with the indexing backend.

pub mod api;
pub mod auth;
pub mod chain;
pub mod config;
pub mod error;
pub mod execution;
pub mod pool;
pub mod pricing;
pub mod sdk;
pub mod token;
pub mod utils;

pub use api::{BackendApi, HttpBackend, TransactionRecord};
pub use chain::{AptosRestClient, ChainClient, LocalSigner, Signer};
pub use config::SdkConfig;
pub use error::{Result, SdkError};
pub use execution::{RecordingOutcome, TradeOutcome};
pub use pool::PoolState;
pub use pricing::params::{BuyRequest, SellRequest, TransactionParameters};
pub use pricing::TradePreview;
pub use sdk::{CurveSdk, TokenInfo};
pub use token::TokenIdentifier;
