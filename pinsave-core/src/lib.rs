//! # Pin Save Core
//!
//! Core types, errors, and traits for the Pin Save decentralized content
//! aggregation backend.
//!
//! This crate provides the foundational building blocks used by all other
//! Pin Save crates:
//!
//! - **Types**: Domain models for drafts, content references, token records,
//!   and post metadata
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Size ceilings, ABI selectors, gateway defaults
//! - **Traits**: Storage backend and wallet capabilities
//!
//! ## Example
//!
//! ```rust
//! use pinsave_core::{ContentReference, StorageScheme};
//!
//! let reference = ContentReference::new(StorageScheme::Ipfs, "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi");
//! assert!(reference.token_uri().starts_with("ipfs://"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{PinSaveError, Result};
pub use traits::*;
pub use types::*;
