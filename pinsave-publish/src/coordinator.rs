//! The publish coordinator driving one upload + mint hand-off per user action.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::instrument;

use pinsave_core::error::{PinSaveError, Result};
use pinsave_core::traits::{StorageBackend, WalletSigner};
use pinsave_core::types::{ContentReference, PostDraft};

use crate::progress::{ProgressSink, TracingSink};

/// The result of a successful publish attempt, ready for the external mint
/// collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Content reference to the stored metadata document.
    pub reference: ContentReference,
    /// Address that will own the minted token.
    pub owner: String,
}

impl PublishOutcome {
    /// The URI the mint transaction stores on chain.
    pub fn token_uri(&self) -> String {
        self.reference.token_uri()
    }
}

/// Validates a submission, selects nothing itself (the backend is chosen by
/// the caller), drives the upload, and reports progress.
///
/// A submit in flight is not cancellable; callers must treat a timeout as
/// "outcome unknown", not "rolled back". One publish may be in flight per
/// coordinator at a time: a second submit fails fast instead of racing the
/// first.
pub struct PublishCoordinator {
    progress: Arc<dyn ProgressSink>,
    in_flight: AtomicBool,
}

impl PublishCoordinator {
    /// Creates a coordinator reporting progress through `tracing`.
    pub fn new() -> Self {
        Self::with_progress(Arc::new(TracingSink))
    }

    /// Creates a coordinator with a custom progress sink.
    pub fn with_progress(progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            progress,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submits one publish attempt.
    ///
    /// Preconditions are checked before any I/O: non-empty title and
    /// description, image present, signer bound with a non-empty address.
    /// Exactly one progress notification is started and exactly one terminal
    /// update issued per call. On failure the draft is untouched so the user
    /// can retry without re-entering fields.
    #[instrument(skip_all, fields(title = %draft.title))]
    pub async fn submit(
        &self,
        draft: &PostDraft,
        signer: Option<&dyn WalletSigner>,
        backend: &dyn StorageBackend,
    ) -> Result<PublishOutcome> {
        self.progress.started(&draft.title);

        let result = self.run(draft, signer, backend).await;

        let terminal = result.as_ref().map(|outcome| outcome.reference.clone());
        self.progress.finished(&draft.title, &terminal);

        result
    }

    async fn run(
        &self,
        draft: &PostDraft,
        signer: Option<&dyn WalletSigner>,
        backend: &dyn StorageBackend,
    ) -> Result<PublishOutcome> {
        let owner = Self::validate(draft, signer)?;

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(PinSaveError::InvalidSubmission(
                "a publish is already in flight".into(),
            ));
        }
        let _guard = InFlightGuard(&self.in_flight);

        let reference = backend.upload(draft).await?;

        Ok(PublishOutcome { reference, owner })
    }

    fn validate(draft: &PostDraft, signer: Option<&dyn WalletSigner>) -> Result<String> {
        if draft.title.is_empty() {
            return Err(PinSaveError::InvalidSubmission("title is empty".into()));
        }
        if draft.description.is_empty() {
            return Err(PinSaveError::InvalidSubmission(
                "description is empty".into(),
            ));
        }
        if draft.image.is_empty() {
            return Err(PinSaveError::InvalidSubmission("image is missing".into()));
        }

        let signer = signer.ok_or_else(|| {
            PinSaveError::InvalidSubmission("wallet signer is not connected".into())
        })?;
        if signer.address().is_empty() {
            return Err(PinSaveError::InvalidSubmission(
                "wallet address is not bound".into(),
            ));
        }

        Ok(signer.address().to_string())
    }
}

impl Default for PublishCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pinsave_core::types::StorageScheme;
    use std::sync::atomic::AtomicU32;

    struct FakeSigner(&'static str);

    impl WalletSigner for FakeSigner {
        fn address(&self) -> &str {
            self.0
        }
    }

    /// Backend that records how many uploads were attempted.
    struct CountingBackend {
        uploads: AtomicU32,
        result: fn() -> Result<ContentReference>,
    }

    impl CountingBackend {
        fn succeeding() -> Self {
            Self {
                uploads: AtomicU32::new(0),
                result: || Ok(ContentReference::new(StorageScheme::Ipfs, "bafymeta")),
            }
        }

        fn failing() -> Self {
            Self {
                uploads: AtomicU32::new(0),
                result: || Err(PinSaveError::NetworkError("pin service down".into())),
            }
        }
    }

    #[async_trait]
    impl StorageBackend for CountingBackend {
        fn scheme(&self) -> StorageScheme {
            StorageScheme::Ipfs
        }

        async fn upload(&self, _draft: &PostDraft) -> Result<ContentReference> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        started: AtomicU32,
        successes: AtomicU32,
        failures: AtomicU32,
        causes: Mutex<Vec<String>>,
    }

    impl ProgressSink for RecordingSink {
        fn started(&self, _title: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn finished(
            &self,
            _title: &str,
            outcome: &std::result::Result<ContentReference, &PinSaveError>,
        ) {
            match outcome {
                Ok(_) => self.successes.fetch_add(1, Ordering::SeqCst),
                Err(cause) => {
                    self.causes.lock().push(cause.to_string());
                    self.failures.fetch_add(1, Ordering::SeqCst)
                }
            };
        }
    }

    fn draft() -> PostDraft {
        PostDraft::new("Sunset", "A sunset", vec![0u8; 2 * 1024 * 1024], "0xabc")
    }

    #[tokio::test]
    async fn test_valid_submit_succeeds_and_hands_off_reference() {
        let sink = Arc::new(RecordingSink::default());
        let coordinator = PublishCoordinator::with_progress(sink.clone());
        let backend = CountingBackend::succeeding();
        let signer = FakeSigner("0xabc");

        let outcome = coordinator
            .submit(&draft(), Some(&signer), &backend)
            .await
            .unwrap();

        assert_eq!(outcome.reference.scheme, StorageScheme::Ipfs);
        assert_eq!(outcome.owner, "0xabc");
        assert_eq!(outcome.token_uri(), "ipfs://bafymeta/metadata.json");
        assert_eq!(sink.started.load(Ordering::SeqCst), 1);
        assert_eq!(sink.successes.load(Ordering::SeqCst), 1);
        assert_eq!(sink.failures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_fields_fail_with_zero_network_calls() {
        let backend = CountingBackend::succeeding();
        let signer = FakeSigner("0xabc");
        let coordinator = PublishCoordinator::new();

        for bad in [
            PostDraft::new("", "A sunset", vec![1], "0xabc"),
            PostDraft::new("Sunset", "", vec![1], "0xabc"),
            PostDraft::new("Sunset", "A sunset", vec![], "0xabc"),
        ] {
            let err = coordinator
                .submit(&bad, Some(&signer), &backend)
                .await
                .unwrap_err();
            assert!(matches!(err, PinSaveError::InvalidSubmission(_)));
        }

        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_signer_is_invalid_submission() {
        let backend = CountingBackend::succeeding();
        let coordinator = PublishCoordinator::new();

        let err = coordinator.submit(&draft(), None, &backend).await.unwrap_err();
        assert!(matches!(err, PinSaveError::InvalidSubmission(_)));

        let unbound = FakeSigner("");
        let err = coordinator
            .submit(&draft(), Some(&unbound), &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, PinSaveError::InvalidSubmission(_)));
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_reports_terminal_cause_and_keeps_draft() {
        let sink = Arc::new(RecordingSink::default());
        let coordinator = PublishCoordinator::with_progress(sink.clone());
        let backend = CountingBackend::failing();
        let signer = FakeSigner("0xabc");
        let attempt = draft();

        let err = coordinator
            .submit(&attempt, Some(&signer), &backend)
            .await
            .unwrap_err();

        assert!(matches!(err, PinSaveError::NetworkError(_)));
        // Exactly one terminal update with a human-readable cause
        assert_eq!(sink.started.load(Ordering::SeqCst), 1);
        assert_eq!(sink.failures.load(Ordering::SeqCst), 1);
        assert_eq!(sink.successes.load(Ordering::SeqCst), 0);
        assert!(sink.causes.lock()[0].contains("pin service down"));
        // Draft retained for retry
        assert_eq!(attempt.title, "Sunset");

        // Retry after a transient failure is caller-initiated and permitted
        let retry = coordinator.submit(&attempt, Some(&signer), &backend).await;
        assert!(retry.is_err());
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_fails_fast() {
        use tokio::sync::Notify;

        /// Backend that blocks until released.
        struct BlockingBackend {
            release: Arc<Notify>,
        }

        #[async_trait]
        impl StorageBackend for BlockingBackend {
            fn scheme(&self) -> StorageScheme {
                StorageScheme::Ipfs
            }

            async fn upload(&self, _draft: &PostDraft) -> Result<ContentReference> {
                self.release.notified().await;
                Ok(ContentReference::new(StorageScheme::Ipfs, "bafymeta"))
            }
        }

        let release = Arc::new(Notify::new());
        let coordinator = Arc::new(PublishCoordinator::new());
        let backend = Arc::new(BlockingBackend {
            release: release.clone(),
        });

        let first = {
            let coordinator = coordinator.clone();
            let backend = backend.clone();
            tokio::spawn(async move {
                let signer = FakeSigner("0xabc");
                coordinator.submit(&draft(), Some(&signer), &*backend).await
            })
        };

        // Let the first submit reach the upload await point
        tokio::task::yield_now().await;

        let signer = FakeSigner("0xabc");
        let second = coordinator.submit(&draft(), Some(&signer), &*backend).await;
        assert!(matches!(
            second,
            Err(PinSaveError::InvalidSubmission(ref msg)) if msg.contains("in flight")
        ));

        release.notify_one();
        assert!(first.await.unwrap().is_ok());

        // Guard released; a fresh submit proceeds
        release.notify_one();
        let third = coordinator.submit(&draft(), Some(&signer), &*backend).await;
        assert!(third.is_ok());
    }
}
