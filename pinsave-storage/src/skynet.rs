//! Skynet storage backend: uploads charged against a funded credit balance.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use pinsave_core::constants::{
    DEFAULT_SKYNET_PORTAL, DEFAULT_TIMEOUT_SECONDS, SKYNET_PRICE_PER_BYTE,
};
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::traits::StorageBackend;
use pinsave_core::types::{ContentReference, PostDraft, StorageScheme};
use pinsave_funding::FundingSession;

use crate::{check_asset_size, render_metadata_document};

/// Skynet backend configuration.
#[derive(Clone, Debug)]
pub struct SkynetBackendConfig {
    /// Portal base URL.
    pub portal_url: String,
    /// Storage price per byte, in base units of the funded balance.
    pub price_per_byte: u128,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SkynetBackendConfig {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_SKYNET_PORTAL.into(),
            price_per_byte: SKYNET_PRICE_PER_BYTE,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl SkynetBackendConfig {
    /// Overrides the portal URL.
    pub fn with_portal(mut self, url: impl Into<String>) -> Self {
        self.portal_url = url.into();
        self
    }
}

/// Storage backend for a credit-charging decentralized storage network.
///
/// Requires a [`FundingSession`]; the live balance is checked against the
/// estimated upload cost before any byte is transferred.
pub struct SkynetBackend {
    config: SkynetBackendConfig,
    session: FundingSession,
    http_client: reqwest::Client,
}

// Skylinks are 46 base64 characters
const SKYLINK_PLACEHOLDER: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, Deserialize)]
struct SkyfileResponse {
    skylink: String,
}

impl SkynetBackend {
    /// Creates a backend paying from the given session.
    pub fn new(config: SkynetBackendConfig, session: FundingSession) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            session,
            http_client,
        }
    }

    fn upload_cost(&self, bytes: usize) -> u128 {
        self.config.price_per_byte * bytes as u128
    }

    async fn upload_object(&self, data: Vec<u8>, file_name: &str) -> Result<String> {
        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        let form = reqwest::multipart::Form::new().part("file", file_part);

        let url = format!(
            "{}/skynet/skyfile",
            self.config.portal_url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(PinSaveError::RejectedByUser(
                    "portal rejected the upload authorization".into(),
                ));
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                return Err(PinSaveError::NetworkError(format!(
                    "Portal upload failed with status {status}: {text}"
                )));
            }
        }

        let body: SkyfileResponse = response
            .json()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        debug!(skylink = %body.skylink, file_name, "Uploaded to portal");
        Ok(body.skylink)
    }
}

#[async_trait]
impl StorageBackend for SkynetBackend {
    fn scheme(&self) -> StorageScheme {
        StorageScheme::Skynet
    }

    /// Checks the funded balance against the estimated cost of both objects,
    /// then uploads the image and a metadata document referencing it.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn upload(&self, draft: &PostDraft) -> Result<ContentReference> {
        check_asset_size(draft)?;

        // The document embeds the full title and description, so its size is
        // draft-dependent. Rendering with a same-length placeholder skylink
        // gives the exact byte count before the image upload exists.
        let estimated_document =
            render_metadata_document(draft, &format!("sia://{SKYLINK_PLACEHOLDER}"));
        let required = self.upload_cost(draft.image.len() + estimated_document.len());
        let available = self.session.balance().await?;
        if available < required {
            return Err(PinSaveError::InsufficientFunds {
                required,
                available,
            });
        }

        let image_skylink = self.upload_object(draft.image.clone(), "image").await?;

        let document = render_metadata_document(draft, &format!("sia://{image_skylink}"));
        let metadata_skylink = self
            .upload_object(document, pinsave_core::constants::METADATA_FILENAME)
            .await?;

        Ok(ContentReference::new(StorageScheme::Skynet, metadata_skylink))
    }
}
