//! Progress notification seam between the coordinator and the view layer.

use tracing::{error, info};

use pinsave_core::error::PinSaveError;
use pinsave_core::types::ContentReference;

/// Receives the visible progress of one publish attempt.
///
/// The coordinator guarantees exactly one `started` and exactly one
/// `finished` call per submit, never both a success and a failure.
pub trait ProgressSink: Send + Sync {
    /// A publish attempt entered its pending state.
    fn started(&self, title: &str);

    /// The attempt reached a terminal state.
    fn finished(&self, title: &str, outcome: &Result<ContentReference, &PinSaveError>);
}

/// Default sink that reports progress through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn started(&self, title: &str) {
        info!(title, "Uploading post");
    }

    fn finished(&self, title: &str, outcome: &Result<ContentReference, &PinSaveError>) {
        match outcome {
            Ok(reference) => {
                info!(title, locator = %reference.locator, "Post uploaded")
            }
            Err(cause) => error!(title, %cause, "Failed to upload post"),
        }
    }
}
