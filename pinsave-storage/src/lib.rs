//! Storage backends for Pin Save.
//!
//! Two variants of the [`pinsave_core::StorageBackend`] capability:
//!
//! - [`IpfsBackend`]: pins the image and generated metadata document to a
//!   pinning-service-backed IPFS network
//! - [`SkynetBackend`]: uploads the same two objects to a storage network
//!   that charges credits from a funded account

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ipfs;
mod skynet;

use pinsave_core::constants::MAX_ASSET_SIZE;
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::types::PostDraft;

pub use ipfs::{IpfsBackend, IpfsBackendConfig};
pub use skynet::{SkynetBackend, SkynetBackendConfig};

/// Rejects oversize assets before any network transfer.
pub(crate) fn check_asset_size(draft: &PostDraft) -> Result<()> {
    if draft.image.len() > MAX_ASSET_SIZE {
        return Err(PinSaveError::AssetTooLarge {
            size: draft.image.len(),
            limit: MAX_ASSET_SIZE,
        });
    }
    Ok(())
}

/// Renders the metadata document stored next to the image.
///
/// `image_uri` is the content-addressed URI of the already-uploaded image.
pub(crate) fn render_metadata_document(draft: &PostDraft, image_uri: &str) -> Vec<u8> {
    serde_json::json!({
        "name": draft.title,
        "description": draft.description,
        "image": image_uri,
    })
    .to_string()
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_at_ceiling_is_accepted() {
        let draft = PostDraft::new("t", "d", vec![0u8; MAX_ASSET_SIZE], "0xabc");
        assert!(check_asset_size(&draft).is_ok());
    }

    #[test]
    fn test_asset_over_ceiling_is_rejected() {
        let draft = PostDraft::new("t", "d", vec![0u8; MAX_ASSET_SIZE + 1], "0xabc");
        let err = check_asset_size(&draft).unwrap_err();
        assert!(matches!(err, PinSaveError::AssetTooLarge { .. }));
    }

    #[test]
    fn test_metadata_document_shape() {
        let draft = PostDraft::new("Sunset", "A sunset", vec![1], "0xabc");
        let doc = render_metadata_document(&draft, "ipfs://bafyimage");
        let parsed: serde_json::Value = serde_json::from_slice(&doc).unwrap();
        assert_eq!(parsed["name"], "Sunset");
        assert_eq!(parsed["description"], "A sunset");
        assert_eq!(parsed["image"], "ipfs://bafyimage");
    }
}
