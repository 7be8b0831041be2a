//! The aggregation service orchestrating chain reads and metadata fetches.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, instrument};

use pinsave_chain::{ChainReader, ChainReaderConfig};
use pinsave_core::constants::{DEFAULT_RESOLVE_CONCURRENCY, DEFAULT_TIMEOUT_SECONDS};
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::types::{PostMetadata, TokenRecord};
use pinsave_metadata::{MetadataResolver, ResolverConfig};

/// Aggregation service configuration.
#[derive(Clone, Debug)]
pub struct AggregationConfig {
    /// Gateway domain for metadata URL rewrites.
    pub gateway_domain: String,
    /// In-flight metadata resolutions. 1 gives a fully sequential scan;
    /// larger values never change the output order.
    pub resolve_concurrency: usize,
    /// Timeout per network call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            gateway_domain: pinsave_core::constants::DEFAULT_GATEWAY_DOMAIN.into(),
            resolve_concurrency: DEFAULT_RESOLVE_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Lists every published post on a chain, newest first.
///
/// One full linear scan per request; no caching, no incremental sync. A
/// single failed metadata resolution aborts the whole listing rather than
/// skipping the item.
pub struct AggregationService {
    reader: ChainReader,
    resolver: MetadataResolver,
    resolve_concurrency: usize,
}

impl AggregationService {
    /// Creates a service with default configuration.
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default())
    }

    /// Creates a service with custom configuration.
    pub fn with_config(config: AggregationConfig) -> Self {
        let reader = ChainReader::with_config(ChainReaderConfig {
            timeout_seconds: config.timeout_seconds,
        });
        let resolver = MetadataResolver::with_config(
            ResolverConfig::default().with_gateway(config.gateway_domain),
        );

        Self::with_components(reader, resolver, config.resolve_concurrency)
    }

    /// Creates a service from pre-built components. The resolver keeps
    /// whatever gateway it was built with.
    pub fn with_components(
        reader: ChainReader,
        resolver: MetadataResolver,
        resolve_concurrency: usize,
    ) -> Self {
        Self {
            reader,
            resolver,
            resolve_concurrency,
        }
    }

    /// Returns every post on the chain's contract, strictly descending by
    /// token id.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, chain_id: u64) -> Result<Vec<PostMetadata>> {
        let records = self.reader.enumerate(chain_id).await?;
        self.resolve_all(records).await
    }

    async fn resolve_all(&self, records: Vec<TokenRecord>) -> Result<Vec<PostMetadata>> {
        let concurrency = self.resolve_concurrency.max(1);

        // `buffered` preserves input order, so the descending enumeration
        // order survives parallel fetches.
        let posts: Vec<PostMetadata> = stream::iter(records)
            .map(|record| {
                let resolver = &self.resolver;
                async move {
                    let fragment = resolver.resolve(&record.token_uri).await?;
                    Ok::<PostMetadata, PinSaveError>(PostMetadata {
                        name: fragment.name,
                        description: fragment.description,
                        image: fragment.image,
                        token_id: record.token_id,
                    })
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        debug_assert!(posts.windows(2).all(|w| w[0].token_id > w[1].token_id));

        info!(posts = posts.len(), "Assembled post listing");
        Ok(posts)
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
