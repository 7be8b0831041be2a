//! Common traits for Pin Save.
//!
//! These traits define the seams between the publish pipeline and its
//! external collaborators, enabling modularity and testing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ContentReference, PostDraft, StorageScheme};

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE
// ═══════════════════════════════════════════════════════════════════════════════

/// A storage network capable of persisting a post's image and metadata
/// document and returning a content-addressed reference to the latter.
///
/// Implementations must reject assets above the fixed size ceiling before
/// attempting any network transfer.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// The scheme references produced by this backend carry.
    fn scheme(&self) -> StorageScheme;

    /// Uploads the draft's image and generated metadata document.
    ///
    /// Returns a reference to the metadata document. On failure the draft is
    /// untouched and the caller may retry.
    async fn upload(&self, draft: &PostDraft) -> Result<ContentReference>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET / FUNDING
// ═══════════════════════════════════════════════════════════════════════════════

/// A wallet-bound funding provider for credit-based storage networks.
///
/// The provider itself is the authority on balance; this system never caches
/// it.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Account address this provider is bound to.
    fn account(&self) -> &str;

    /// Whether a wallet injection is present and the provider is usable.
    fn is_available(&self) -> bool;

    /// Performs a live balance query, in base units.
    async fn balance(&self) -> Result<u128>;

    /// Tops up the funded balance. `None` lets the provider choose its
    /// default amount. May fail with `RejectedByUser` if the signer declines.
    async fn fund(&self, amount: Option<u128>) -> Result<()>;
}

/// An opaque signer bound to a wallet address.
///
/// The coordinator only requires its presence; transaction signing itself
/// belongs to the external mint collaborator.
pub trait WalletSigner: Send + Sync {
    /// The address that will own published content.
    fn address(&self) -> &str;
}
