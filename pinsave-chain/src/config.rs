//! Static chain configuration table.
//!
//! One entry per network the Pin Save contract is deployed to. RPC URLs can
//! be overridden per chain with `PINSAVE_RPC_URL_<chain id>`.

use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::types::ChainConfig;

struct ChainEntry {
    chain_id: u64,
    name: &'static str,
    rpc_url: &'static str,
    contract_address: &'static str,
}

const CHAINS: &[ChainEntry] = &[
    ChainEntry {
        chain_id: 250,
        name: "Fantom",
        rpc_url: "https://rpc.ankr.com/fantom/",
        contract_address: "0xd74B28b21f91A3587ba2BcE47D25af27fDcC1Fa7",
    },
    ChainEntry {
        chain_id: 80001,
        name: "Polygon Mumbai",
        rpc_url: "https://rpc-mumbai.maticvigil.com/",
        contract_address: "0xC0397A9A5b5cb7303b7D902635bC8C0EBBBe4e02",
    },
    ChainEntry {
        chain_id: 56,
        name: "BNB Smart Chain",
        rpc_url: "https://bsc-dataseed.binance.org/",
        contract_address: "0xE9E97001544124c4a8d26C1E06031eD53c221afE",
    },
    ChainEntry {
        chain_id: 7700,
        name: "Canto",
        rpc_url: "https://canto.slingshot.finance/",
        contract_address: "0x5c32A7d26b0Dd9Bba6EC85556AbeBDcc1671CE1a",
    },
    ChainEntry {
        chain_id: 5001,
        name: "Mantle Testnet",
        rpc_url: "https://rpc.testnet.mantle.xyz/",
        contract_address: "0x9Ae1A5a7c1E6Fb0C9d8a3f2E4b68c7D20A8F9b31",
    },
    ChainEntry {
        chain_id: 314,
        name: "Filecoin",
        rpc_url: "https://rpc.ankr.com/filecoin",
        contract_address: "0x2e8A3409a0fB04c6C65a1b7dC53AF9Bb4cDd0b31",
    },
];

/// Resolves the configuration for a chain id.
///
/// Fails with `UnsupportedChain` when no contract is registered for the id;
/// the read path fails fast on this before touching the network.
pub fn resolve_chain_config(chain_id: u64) -> Result<ChainConfig> {
    let entry = CHAINS
        .iter()
        .find(|entry| entry.chain_id == chain_id)
        .ok_or(PinSaveError::UnsupportedChain(chain_id))?;

    let rpc_url = std::env::var(format!("PINSAVE_RPC_URL_{chain_id}"))
        .unwrap_or_else(|_| entry.rpc_url.to_string());

    Ok(ChainConfig {
        chain_id: entry.chain_id,
        name: entry.name.to_string(),
        rpc_url,
        contract_address: entry.contract_address.to_string(),
    })
}

/// Returns the configuration of every supported chain.
pub fn supported_chains() -> Vec<ChainConfig> {
    CHAINS
        .iter()
        .map(|entry| resolve_chain_config(entry.chain_id))
        .collect::<Result<_>>()
        .unwrap_or_default()
}
