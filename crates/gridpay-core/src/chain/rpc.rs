use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use tracing::debug;

use super::{ChainError, ChainRpc};

/// Handle to a Solana RPC endpoint, long-lived for the process.
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    pub fn new(url: String) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url, CommitmentConfig::finalized()),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

impl ChainRpc for SolanaRpc {
    async fn latest_blockhash(&self) -> Result<Hash, ChainError> {
        let (blockhash, last_valid_height) = self
            .client
            .get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
            .await?;
        debug!(%blockhash, last_valid_height, "Fetched latest blockhash");
        Ok(blockhash)
    }
}
