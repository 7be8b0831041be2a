//! Protocol constants for Pin Save.

// ═══════════════════════════════════════════════════════════════════════════════
// UPLOAD LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum asset size accepted by any storage backend, in bytes (5 MiB).
/// Checked before any network transfer is attempted.
pub const MAX_ASSET_SIZE: usize = 5 * 1024 * 1024;

/// File name of the generated metadata document inside a pinned directory.
/// The on-chain token URI points at this document.
pub const METADATA_FILENAME: &str = "metadata.json";

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT ABI SELECTORS
// ═══════════════════════════════════════════════════════════════════════════════
// keccak256 of the canonical signature, first 4 bytes. Verified against a
// live keccak computation in pinsave-chain's tests.

/// 4-byte selector for `totalSupply()`.
pub const SELECTOR_TOTAL_SUPPLY: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];

/// 4-byte selector for `tokenURI(uint256)`.
pub const SELECTOR_TOKEN_URI: [u8; 4] = [0xc8, 0x7b, 0x56, 0xdd];

// ═══════════════════════════════════════════════════════════════════════════════
// GATEWAY & PORTAL DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default IPFS gateway domain used for subdomain-routed rewrites
/// (`<cid>.ipfs.<domain>`).
pub const DEFAULT_GATEWAY_DOMAIN: &str = "nftstorage.link";

/// Default Skynet portal for credit-backed uploads.
pub const DEFAULT_SKYNET_PORTAL: &str = "https://siasky.net";

/// Default Pinata upload endpoint (v3 API).
pub const DEFAULT_PINNING_API_URL: &str = "https://uploads.pinata.cloud/v3/files";

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default timeout applied to every outbound network call, in seconds.
/// No call may hang indefinitely; timeouts surface as the backend-appropriate
/// error kind.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default number of in-flight metadata resolutions during aggregation.
/// Ordering is preserved regardless of this value.
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 8;

/// Default top-up amount in base units when `fund` is called without an
/// explicit amount (0.01 tokens at 18 decimals).
pub const DEFAULT_FUND_AMOUNT: u128 = 10_000_000_000_000_000;

/// Skynet storage price per byte, in base units. Used to estimate upload cost
/// against the live funded balance before transfer.
pub const SKYNET_PRICE_PER_BYTE: u128 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ceiling_is_five_mebibytes() {
        assert_eq!(MAX_ASSET_SIZE, 5_242_880);
    }

    #[test]
    fn test_selectors_are_distinct() {
        assert_ne!(SELECTOR_TOTAL_SUPPLY, SELECTOR_TOKEN_URI);
    }
}
