//! DTOs for API responses.

use serde::Serialize;

use pinsave_core::types::ChainConfig;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server is up.
    pub status: &'static str,
}

/// One supported chain, without its RPC endpoint.
#[derive(Debug, Serialize)]
pub struct ChainDto {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human-readable network name.
    pub name: String,
    /// Deployed contract address.
    pub contract_address: String,
}

impl From<ChainConfig> for ChainDto {
    fn from(config: ChainConfig) -> Self {
        Self {
            chain_id: config.chain_id,
            name: config.name,
            contract_address: config.contract_address,
        }
    }
}
