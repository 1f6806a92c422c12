//! gridpay-core - Grid smart-account client library.
//!
//! This crate contains the pieces of gridpay that do not touch the terminal:
//!
//! - `config`: environment-driven configuration and network selection
//! - `api`: the Grid API boundary (`GridApi` trait, HTTP client, response normalization)
//! - `auth`: session context and per-login session secrets
//! - `chain`: the Solana RPC boundary and local transfer construction
//! - `models`: balances and transfer requests
//! - `flows`: the login, balance and transfer procedures, reporting through `FlowEvent`s
//!
//! Front-ends (the `gridpay` binary) own prompting and presentation.

pub mod api;
pub mod auth;
pub mod chain;
pub mod config;
pub mod error;
pub mod flows;
pub mod models;
pub mod utils;

pub use api::{ApiError, GridApi, GridClient};
pub use auth::{Session, SessionContext, SessionSecrets};
pub use chain::{ChainError, ChainRpc, SolanaRpc};
pub use config::{Config, ConfigError, Environment};
pub use error::FlowError;
pub use flows::{EventSink, FlowEvent};
pub use models::{AccountBalances, Token, TokenBalance, TransferRequest};
