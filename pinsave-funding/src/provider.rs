//! HTTP wallet provider against a Bundlr-style funding node.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use pinsave_core::constants::{DEFAULT_FUND_AMOUNT, DEFAULT_TIMEOUT_SECONDS};
use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::traits::WalletProvider;

/// Credit provider configuration.
#[derive(Clone, Debug)]
pub struct CreditProviderConfig {
    /// Funding node base URL (e.g. "https://node1.bundlr.network").
    pub node_url: String,
    /// Settlement currency identifier (e.g. "matic").
    pub currency: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl CreditProviderConfig {
    /// Creates a config for the given node and currency.
    pub fn new(node_url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            currency: currency.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Wallet provider backed by a funding node's HTTP account API.
pub struct CreditProvider {
    config: CreditProviderConfig,
    account: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: String,
}

impl CreditProvider {
    /// Creates a provider bound to a wallet account.
    pub fn new(config: CreditProviderConfig, account: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            account: account.into(),
            http_client,
        }
    }
}

#[async_trait]
impl WalletProvider for CreditProvider {
    fn account(&self) -> &str {
        &self.account
    }

    fn is_available(&self) -> bool {
        !self.account.is_empty()
    }

    #[instrument(skip(self))]
    async fn balance(&self) -> Result<u128> {
        let url = format!(
            "{}/account/balance/{}?address={}",
            self.config.node_url.trim_end_matches('/'),
            self.config.currency,
            self.account
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PinSaveError::NetworkError(format!(
                "Balance query returned HTTP {}",
                response.status()
            )));
        }

        let body: BalanceResponse = response
            .json()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        let balance = body.balance.parse::<u128>().map_err(|e| {
            PinSaveError::NetworkError(format!("Unparseable balance '{}': {e}", body.balance))
        })?;

        debug!(account = %self.account, balance, "Queried funded balance");
        Ok(balance)
    }

    #[instrument(skip(self))]
    async fn fund(&self, amount: Option<u128>) -> Result<()> {
        let amount = amount.unwrap_or(DEFAULT_FUND_AMOUNT);
        let url = format!(
            "{}/account/fund/{}",
            self.config.node_url.trim_end_matches('/'),
            self.config.currency
        );

        let body = serde_json::json!({
            "address": self.account,
            "amount": amount.to_string(),
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PinSaveError::NetworkError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(PinSaveError::RejectedByUser(
                    "funding transaction was not signed".into(),
                ))
            }
            status => Err(PinSaveError::NetworkError(format!(
                "Fund request returned HTTP {status}"
            ))),
        }
    }
}

/// Formats a base-unit amount as a decimal token string (18 decimals).
pub fn format_units(amount: u128) -> String {
    const DECIMALS: u128 = 1_000_000_000_000_000_000;
    let whole = amount / DECIMALS;
    let frac = amount % DECIMALS;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(0), "0");
        assert_eq!(format_units(1_000_000_000_000_000_000), "1");
        assert_eq!(format_units(1_500_000_000_000_000_000), "1.5");
        assert_eq!(format_units(10_000_000_000_000_000), "0.01");
    }

    #[tokio::test]
    async fn test_balance_live_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/balance/matic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "balance": "123456"
            })))
            .mount(&server)
            .await;

        let provider = CreditProvider::new(
            CreditProviderConfig::new(server.uri(), "matic"),
            "0xabc",
        );
        assert_eq!(provider.balance().await.unwrap(), 123_456);
    }

    #[tokio::test]
    async fn test_fund_denied_signature_is_rejected_by_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/fund/matic"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = CreditProvider::new(
            CreditProviderConfig::new(server.uri(), "matic"),
            "0xabc",
        );
        let err = provider.fund(None).await.unwrap_err();
        assert!(matches!(err, PinSaveError::RejectedByUser(_)));
    }

    #[test]
    fn test_empty_account_is_unavailable() {
        let provider = CreditProvider::new(
            CreditProviderConfig::new("https://node.example", "matic"),
            "",
        );
        assert!(!provider.is_available());
    }
}
