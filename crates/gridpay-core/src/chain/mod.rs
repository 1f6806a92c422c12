//! Solana boundary.
//!
//! - `ChainRpc`: the one RPC read the transfer flows need
//! - `SolanaRpc`: `ChainRpc` over the nonblocking Solana RPC client
//! - `transfer`: local construction and encoding of native SOL transfers

pub mod rpc;
pub mod transfer;

use std::future::Future;

use solana_sdk::hash::Hash;
use thiserror::Error;

pub use rpc::SolanaRpc;
pub use transfer::{build_native_transfer, encode_unsigned};

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Failed to encode transaction: {0}")]
    Encode(#[from] bincode::Error),
}

pub trait ChainRpc: Send + Sync {
    /// Latest blockhash at finalized commitment
    fn latest_blockhash(&self) -> impl Future<Output = Result<Hash, ChainError>> + Send;
}
