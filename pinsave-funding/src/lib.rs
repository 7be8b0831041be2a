//! Funding sessions for credit-based storage networks.
//!
//! A [`FundingSession`] binds a paying client to the active wallet provider.
//! Sessions are explicit values passed into every operation that needs them;
//! there is no ambient singleton.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod provider;
mod session;

pub use provider::{format_units, CreditProvider, CreditProviderConfig};
pub use session::{FundingManager, FundingSession};
