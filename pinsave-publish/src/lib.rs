//! Publish coordination: validation, backend upload, progress reporting, and
//! hand-off of the resulting content reference to the mint collaborator.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod coordinator;
mod progress;

pub use coordinator::{PublishCoordinator, PublishOutcome};
pub use progress::{ProgressSink, TracingSink};
