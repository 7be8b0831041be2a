//! Token URI rewriting and metadata document fetching.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use pinsave_core::constants::{DEFAULT_GATEWAY_DOMAIN, DEFAULT_TIMEOUT_SECONDS, METADATA_FILENAME};
use pinsave_core::error::{PinSaveError, Result};

/// Rewrites a stored content URI into a fetchable HTTPS gateway URL.
///
/// Pure function. The `ipfs://` prefix becomes `https://`, and a trailing
/// `/metadata.json` path is rewritten onto the gateway's content-addressed
/// subdomain (`<cid>.ipfs.<gateway>/metadata.json`). Non-`ipfs://` URIs pass
/// through unmodified.
pub fn rewrite_gateway_url(token_uri: &str, gateway_domain: &str) -> String {
    let Some(rest) = token_uri.strip_prefix("ipfs://") else {
        return token_uri.to_string();
    };

    let suffix = format!("/{METADATA_FILENAME}");
    match rest.strip_suffix(&suffix) {
        Some(cid) => format!("https://{cid}.ipfs.{gateway_domain}/{METADATA_FILENAME}"),
        None => format!("https://{rest}"),
    }
}

/// The metadata fields extracted from a fetched document.
///
/// The nested `image` URI is returned exactly as stored; rewriting it is the
/// consumer's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFragment {
    /// Post title.
    pub name: String,
    /// Post description.
    pub description: String,
    /// Image URI as stored in the document.
    pub image: String,
}

/// Metadata resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Gateway domain used for subdomain-routed rewrites.
    pub gateway_domain: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            gateway_domain: DEFAULT_GATEWAY_DOMAIN.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ResolverConfig {
    /// Overrides the gateway domain.
    pub fn with_gateway(mut self, domain: impl Into<String>) -> Self {
        self.gateway_domain = domain.into();
        self
    }
}

/// Fetches and parses stored metadata documents.
pub struct MetadataResolver {
    config: ResolverConfig,
    http_client: reqwest::Client,
}

impl MetadataResolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Resolves a token URI to its metadata fragment.
    ///
    /// Idempotent under equal network conditions. Fails with
    /// `MetadataFetchError` when the network call fails or the body is not
    /// valid JSON, and `MetadataShapeError` when required fields are absent.
    #[instrument(skip(self))]
    pub async fn resolve(&self, token_uri: &str) -> Result<MetadataFragment> {
        let url = rewrite_gateway_url(token_uri, &self.config.gateway_domain);
        debug!(token_uri, url, "Fetching metadata document");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PinSaveError::MetadataFetchError {
                uri: token_uri.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PinSaveError::MetadataFetchError {
                uri: token_uri.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let document: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| PinSaveError::MetadataFetchError {
                    uri: token_uri.to_string(),
                    reason: format!("Invalid JSON body: {e}"),
                })?;

        Self::extract(token_uri, &document)
    }

    fn extract(token_uri: &str, document: &serde_json::Value) -> Result<MetadataFragment> {
        let field = |name: &str| -> Result<String> {
            document
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| PinSaveError::MetadataShapeError {
                    uri: token_uri.to_string(),
                    field: name.to_string(),
                })
        };

        Ok(MetadataFragment {
            name: field("name")?,
            description: field("description")?,
            image: field("image")?,
        })
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test_case(
        "ipfs://bafybeic0ffee/metadata.json",
        "https://bafybeic0ffee.ipfs.nftstorage.link/metadata.json";
        "metadata document routes through subdomain"
    )]
    #[test_case(
        "ipfs://bafybeic0ffee",
        "https://bafybeic0ffee";
        "bare cid only swaps the scheme"
    )]
    #[test_case(
        "https://example.com/already/http.json",
        "https://example.com/already/http.json";
        "non ipfs uri passes through"
    )]
    #[test_case(
        "sia://AACoffee",
        "sia://AACoffee";
        "skynet uri passes through"
    )]
    fn test_rewrite_gateway_url(input: &str, expected: &str) {
        assert_eq!(rewrite_gateway_url(input, "nftstorage.link"), expected);
    }

    #[test]
    fn test_rewrite_is_pure() {
        let uri = "ipfs://bafyX/metadata.json";
        assert_eq!(
            rewrite_gateway_url(uri, "nftstorage.link"),
            rewrite_gateway_url(uri, "nftstorage.link"),
        );
    }

    #[tokio::test]
    async fn test_resolve_parses_required_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Sunset",
                "description": "A sunset",
                "image": "ipfs://bafyimage"
            })))
            .mount(&server)
            .await;

        let resolver = MetadataResolver::new();
        // Non-ipfs URI passes through the rewrite untouched
        let fragment = resolver
            .resolve(&format!("{}/doc.json", server.uri()))
            .await
            .unwrap();

        assert_eq!(fragment.name, "Sunset");
        // Nested image URI is returned as-is, not rewritten
        assert_eq!(fragment.image, "ipfs://bafyimage");
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Sunset", "description": "A sunset", "image": "ipfs://x"
            })))
            .mount(&server)
            .await;

        let resolver = MetadataResolver::new();
        let uri = format!("{}/doc.json", server.uri());
        let first = resolver.resolve(&uri).await.unwrap();
        let second = resolver.resolve(&uri).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_field_is_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Sunset", "description": "A sunset"
            })))
            .mount(&server)
            .await;

        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve(&format!("{}/doc.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PinSaveError::MetadataShapeError { ref field, .. } if field == "image"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve(&format!("{}/doc.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, PinSaveError::MetadataFetchError { .. }));
    }

    #[tokio::test]
    async fn test_http_failure_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve(&format!("{}/doc.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, PinSaveError::MetadataFetchError { .. }));
    }
}
