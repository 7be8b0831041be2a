//! Funding manager and per-wallet sessions.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::traits::WalletProvider;

/// A paying client bound to one wallet provider.
///
/// Created once per page lifetime on first funding need, destroyed when the
/// wallet disconnects. Balance is never cached here; the provider is the
/// authority.
#[derive(Clone)]
pub struct FundingSession {
    account: String,
    provider: Arc<dyn WalletProvider>,
}

impl FundingSession {
    /// The wallet account this session pays from.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Performs a live balance query in base units. Callers needing a fresh
    /// value after `fund` must call this again.
    pub async fn balance(&self) -> Result<u128> {
        self.provider.balance().await
    }

    /// Tops up the funded balance. `None` lets the provider pick its default
    /// amount.
    #[instrument(skip(self))]
    pub async fn fund(&self, amount: Option<u128>) -> Result<()> {
        self.provider.fund(amount).await?;
        info!(account = %self.account, ?amount, "Funded storage balance");
        Ok(())
    }
}

impl std::fmt::Debug for FundingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingSession")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// Establishes and reuses funding sessions.
#[derive(Default)]
pub struct FundingManager {
    // account → session; one paying client per wallet provider instance
    sessions: Mutex<Vec<FundingSession>>,
}

impl FundingManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establishes a paying client bound to the given wallet provider.
    ///
    /// Idempotent per provider account: a second call with a provider for an
    /// already-bound account returns the existing session instead of
    /// establishing a second paying client. Fails with `ProviderUnavailable`
    /// when no wallet injection is present; callers treat that as non-fatal
    /// and disable funding-dependent features.
    #[instrument(skip(self, provider))]
    pub fn initialize(&self, provider: Arc<dyn WalletProvider>) -> Result<FundingSession> {
        if !provider.is_available() {
            return Err(PinSaveError::ProviderUnavailable(
                "no wallet injection present".into(),
            ));
        }

        let account = provider.account().to_string();
        let mut sessions = self.sessions.lock();

        if let Some(existing) = sessions.iter().find(|s| s.account == account) {
            debug!(account, "Reusing existing funding session");
            return Ok(existing.clone());
        }

        let session = FundingSession { account, provider };
        sessions.push(session.clone());
        info!(account = %session.account, "Established funding session");
        Ok(session)
    }

    /// Drops the session bound to `account`, e.g. on wallet disconnect.
    pub fn disconnect(&self, account: &str) {
        self.sessions.lock().retain(|s| s.account != account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeProvider {
        account: String,
        available: bool,
        balance: Mutex<u128>,
        balance_queries: AtomicU32,
    }

    impl FakeProvider {
        fn new(account: &str, balance: u128) -> Arc<Self> {
            Arc::new(Self {
                account: account.into(),
                available: true,
                balance: Mutex::new(balance),
                balance_queries: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl WalletProvider for FakeProvider {
        fn account(&self) -> &str {
            &self.account
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn balance(&self) -> Result<u128> {
            self.balance_queries.fetch_add(1, Ordering::SeqCst);
            Ok(*self.balance.lock())
        }

        async fn fund(&self, amount: Option<u128>) -> Result<()> {
            *self.balance.lock() += amount.unwrap_or(100);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent_per_account() {
        let manager = FundingManager::new();
        let provider = FakeProvider::new("0xabc", 500);

        let first = manager.initialize(provider.clone()).unwrap();
        let second = manager.initialize(provider).unwrap();

        assert_eq!(first.account(), second.account());
        assert_eq!(manager.sessions.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_nonfatal_error() {
        let manager = FundingManager::new();
        let provider = Arc::new(FakeProvider {
            account: "0xabc".into(),
            available: false,
            balance: Mutex::new(0),
            balance_queries: AtomicU32::new(0),
        });

        let err = manager.initialize(provider).unwrap_err();
        assert!(matches!(err, PinSaveError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_balance_is_always_a_live_query() {
        let manager = FundingManager::new();
        let provider = FakeProvider::new("0xabc", 500);
        let session = manager.initialize(provider.clone()).unwrap();

        assert_eq!(session.balance().await.unwrap(), 500);
        session.fund(Some(250)).await.unwrap();
        // A fresh value requires a fresh call, and gets one
        assert_eq!(session.balance().await.unwrap(), 750);
        assert_eq!(provider.balance_queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disconnect_drops_session() {
        let manager = FundingManager::new();
        let provider = FakeProvider::new("0xabc", 500);
        manager.initialize(provider.clone()).unwrap();

        manager.disconnect("0xabc");
        assert!(manager.sessions.lock().is_empty());

        // A new initialize establishes a fresh paying client
        manager.initialize(provider).unwrap();
        assert_eq!(manager.sessions.lock().len(), 1);
    }
}
