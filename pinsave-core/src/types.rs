//! Domain types for Pin Save.
//!
//! - [`PostDraft`]: one publish attempt's worth of user input
//! - [`StorageScheme`] / [`ContentReference`]: content-addressed locators
//! - [`TokenRecord`]: on-chain token id + URI pairing
//! - [`PostMetadata`]: the externally visible unit returned by the read path
//! - [`ChainConfig`]: static per-chain contract configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::METADATA_FILENAME;
use crate::error::PinSaveError;

/// A post draft assembled from user input.
///
/// Mutable until submit, never persisted; it exists only for the duration of
/// one publish attempt and is retained by the caller on failure so the user
/// can retry without re-entering fields.
#[derive(Clone, Debug, Default)]
pub struct PostDraft {
    /// Post title (rendered as metadata `name`).
    pub title: String,
    /// Post description.
    pub description: String,
    /// Raw image bytes.
    pub image: Vec<u8>,
    /// Address that will own the minted token.
    pub owner: String,
}

impl PostDraft {
    /// Creates a draft from its parts.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image: Vec<u8>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image,
            owner: owner.into(),
        }
    }

    /// Returns true when every required field is present.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.image.is_empty()
    }
}

/// Storage network a content reference lives on.
///
/// A closed enum rather than a string flag: selecting a backend by typo is a
/// compile error, and a third network is one variant away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScheme {
    /// Pinning-service-backed IPFS network.
    Ipfs,
    /// Decentralized storage credit network (Skynet).
    Skynet,
}

impl StorageScheme {
    /// URI scheme prefix for this storage network.
    pub fn uri_prefix(&self) -> &'static str {
        match self {
            StorageScheme::Ipfs => "ipfs://",
            StorageScheme::Skynet => "sia://",
        }
    }
}

impl fmt::Display for StorageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScheme::Ipfs => write!(f, "ipfs"),
            StorageScheme::Skynet => write!(f, "skynet"),
        }
    }
}

impl FromStr for StorageScheme {
    type Err = PinSaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ipfs" => Ok(StorageScheme::Ipfs),
            "skynet" | "sia" => Ok(StorageScheme::Skynet),
            other => Err(PinSaveError::ConfigError(format!(
                "Unknown storage scheme: {other}"
            ))),
        }
    }
}

/// An immutable, content-addressed locator returned by a storage backend.
///
/// Its absence means the publish attempt did not reach the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReference {
    /// Network the content lives on.
    pub scheme: StorageScheme,
    /// Hash-derived locator (IPFS CID or skylink) of the metadata document.
    pub locator: String,
}

impl ContentReference {
    /// Creates a reference from scheme and locator.
    pub fn new(scheme: StorageScheme, locator: impl Into<String>) -> Self {
        Self {
            scheme,
            locator: locator.into(),
        }
    }

    /// Renders the URI stored on chain as the token URI.
    ///
    /// IPFS references point at the metadata document inside the pinned
    /// directory; Skynet references point at the skylink directly.
    pub fn token_uri(&self) -> String {
        match self.scheme {
            StorageScheme::Ipfs => format!(
                "{}{}/{}",
                self.scheme.uri_prefix(),
                self.locator,
                METADATA_FILENAME
            ),
            StorageScheme::Skynet => format!("{}{}", self.scheme.uri_prefix(), self.locator),
        }
    }
}

/// One on-chain token: numeric identifier plus its stored content-reference
/// string. Produced and consumed within a single aggregation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRecord {
    /// Positive token identifier (token numbering starts at 1).
    pub token_id: u64,
    /// Raw `tokenURI(id)` value from the contract.
    pub token_uri: String,
}

/// A resolved post as returned by the read API.
///
/// Ordering across a listing is strictly descending by `token_id` (newest
/// first); no deduplication is performed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Post title.
    pub name: String,
    /// Post description.
    pub description: String,
    /// Image URL exactly as stored in the metadata document (not rewritten).
    pub image: String,
    /// Token id this metadata was resolved for.
    pub token_id: u64,
}

/// Static configuration for one supported chain.
///
/// Every chain id used by the read path must resolve to exactly one of
/// these, or the read fails fast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human-readable network name.
    pub name: String,
    /// JSON-RPC endpoint for read calls.
    pub rpc_url: String,
    /// Deployed Pin Save contract address (0x-prefixed).
    pub contract_address: String,
}
