//! App state: aggregation service and configuration.

use pinsave_aggregate::{AggregationConfig, AggregationService};
use pinsave_core::constants::{
    DEFAULT_GATEWAY_DOMAIN, DEFAULT_RESOLVE_CONCURRENCY, DEFAULT_TIMEOUT_SECONDS,
};

/// API configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Gateway domain for metadata URL rewrites.
    pub gateway_domain: String,
    /// In-flight metadata resolutions during a listing.
    pub resolve_concurrency: usize,
    /// Timeout per outbound network call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gateway_domain: DEFAULT_GATEWAY_DOMAIN.into(),
            resolve_concurrency: DEFAULT_RESOLVE_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            gateway_domain: std::env::var("PINSAVE_GATEWAY_DOMAIN")
                .unwrap_or(defaults.gateway_domain),
            resolve_concurrency: std::env::var("PINSAVE_RESOLVE_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.resolve_concurrency),
            timeout_seconds: std::env::var("PINSAVE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        }
    }
}

/// Shared state behind the router.
pub struct AppState {
    /// Active configuration.
    pub config: ApiConfig,
    /// Aggregation read path.
    pub service: AggregationService,
}

impl AppState {
    /// Builds the state from configuration.
    pub fn new(config: ApiConfig) -> Self {
        let service = AggregationService::with_config(AggregationConfig {
            gateway_domain: config.gateway_domain.clone(),
            resolve_concurrency: config.resolve_concurrency,
            timeout_seconds: config.timeout_seconds,
        });

        Self { config, service }
    }
}
