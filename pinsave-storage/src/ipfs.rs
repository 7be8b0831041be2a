//! IPFS storage backend via a Pinata-style pinning service.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use pinsave_core::constants::{DEFAULT_PINNING_API_URL, DEFAULT_TIMEOUT_SECONDS};
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::traits::StorageBackend;
use pinsave_core::types::{ContentReference, PostDraft, StorageScheme};

use crate::{check_asset_size, render_metadata_document};

/// IPFS backend configuration.
#[derive(Clone, Debug)]
pub struct IpfsBackendConfig {
    /// Pinning service upload endpoint.
    pub api_url: String,
    /// JWT for upload authorization.
    pub jwt: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl IpfsBackendConfig {
    /// Creates a config with the default pinning endpoint.
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_PINNING_API_URL.into(),
            jwt: jwt.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Overrides the upload endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// Storage backend that pins content to IPFS through a pinning service.
pub struct IpfsBackend {
    config: IpfsBackendConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    data: PinData,
}

#[derive(Debug, Deserialize)]
struct PinData {
    cid: String,
}

impl IpfsBackend {
    /// Creates a backend with the given config.
    pub fn with_config(config: IpfsBackendConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Pins one object and returns its CID.
    async fn pin(&self, data: Vec<u8>, file_name: &str, mime: &str) -> Result<String> {
        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("network", "public")
            .text("name", file_name.to_string());

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.jwt))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PinSaveError::NetworkError(format!(
                "Pinning failed with status {status}: {text}"
            )));
        }

        let body: PinResponse = response
            .json()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        debug!(cid = %body.data.cid, file_name, "Pinned to IPFS");
        Ok(body.data.cid)
    }
}

#[async_trait]
impl StorageBackend for IpfsBackend {
    fn scheme(&self) -> StorageScheme {
        StorageScheme::Ipfs
    }

    /// Pins the image, then a metadata document referencing it. The returned
    /// reference points at the metadata document.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn upload(&self, draft: &PostDraft) -> Result<ContentReference> {
        check_asset_size(draft)?;

        let image_cid = self
            .pin(draft.image.clone(), "image", "application/octet-stream")
            .await?;

        let document = render_metadata_document(draft, &format!("ipfs://{image_cid}"));
        let metadata_cid = self
            .pin(
                document,
                pinsave_core::constants::METADATA_FILENAME,
                "application/json",
            )
            .await?;

        Ok(ContentReference::new(StorageScheme::Ipfs, metadata_cid))
    }
}
