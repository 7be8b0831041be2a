//! Read-only contract client performing the supply-enumeration scan.

use serde_json::json;
use tracing::{debug, instrument, warn};

use pinsave_core::constants::{
    DEFAULT_TIMEOUT_SECONDS, SELECTOR_TOKEN_URI, SELECTOR_TOTAL_SUPPLY,
};
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::types::{ChainConfig, TokenRecord};

use crate::abi;
use crate::config::resolve_chain_config;

/// Chain reader configuration.
#[derive(Clone, Debug)]
pub struct ChainReaderConfig {
    /// Timeout applied to each RPC call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for ChainReaderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Read-only JSON-RPC client for the Pin Save contract.
///
/// Holds no per-chain state; the chain id is resolved to a [`ChainConfig`]
/// on every enumeration.
pub struct ChainReader {
    http_client: reqwest::Client,
}

impl ChainReader {
    /// Creates a reader with default configuration.
    pub fn new() -> Self {
        Self::with_config(ChainReaderConfig::default())
    }

    /// Creates a reader with custom configuration.
    pub fn with_config(config: ChainReaderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    /// Enumerates every token on the chain's contract, newest first.
    ///
    /// Queries `totalSupply` once, then `tokenURI(id)` for each id from the
    /// supply down to 1 inclusive. Token id 0 is never queried. A failed
    /// supply query aborts with `ChainReadError` and no partial list.
    #[instrument(skip(self))]
    pub async fn enumerate(&self, chain_id: u64) -> Result<Vec<TokenRecord>> {
        let config = resolve_chain_config(chain_id)?;
        self.enumerate_with_config(&config).await
    }

    /// Enumerates against an explicitly supplied chain configuration.
    pub async fn enumerate_with_config(&self, config: &ChainConfig) -> Result<Vec<TokenRecord>> {
        let supply_return = self
            .eth_call(config, abi::encode_call(SELECTOR_TOTAL_SUPPLY))
            .await?;
        let total_supply = abi::decode_uint(&supply_return)?;

        debug!(chain_id = config.chain_id, total_supply, "Read total supply");

        let mut records = Vec::with_capacity(total_supply as usize);
        for token_id in (1..=total_supply).rev() {
            let uri_return = self
                .eth_call(config, abi::encode_call_uint(SELECTOR_TOKEN_URI, token_id))
                .await?;
            let token_uri = abi::decode_string(&uri_return)?;
            records.push(TokenRecord { token_id, token_uri });
        }

        Ok(records)
    }

    async fn eth_call(&self, config: &ChainConfig, call_data: String) -> Result<String> {
        let request = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": config.contract_address,
                    "data": call_data,
                },
                "latest"
            ],
            "id": 1
        });

        let response = self
            .http_client
            .post(&config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PinSaveError::ChainReadError(format!("RPC transport: {e}")))?;

        if !response.status().is_success() {
            return Err(PinSaveError::ChainReadError(format!(
                "RPC returned HTTP {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PinSaveError::ChainReadError(format!("RPC body: {e}")))?;

        if let Some(error) = body.get("error") {
            warn!(chain_id = config.chain_id, error = %error, "RPC error");
            return Err(PinSaveError::ChainReadError(format!("RPC error: {error}")));
        }

        body.get("result")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| PinSaveError::ChainReadError("RPC response missing result".into()))
    }
}

impl Default for ChainReader {
    fn default() -> Self {
        Self::new()
    }
}
