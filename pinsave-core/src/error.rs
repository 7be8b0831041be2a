//! Error types for Pin Save.
//!
//! This module provides the error hierarchy for both pipelines using
//! `thiserror`. Every user-facing failure carries a distinguishable kind plus
//! a human-readable cause.

use thiserror::Error;

/// Result type alias using `PinSaveError`.
pub type Result<T> = std::result::Result<T, PinSaveError>;

/// Main error type for all Pin Save operations.
#[derive(Debug, Error)]
pub enum PinSaveError {
    // ═══════════════════════════════════════════════════════════════════════════
    // PUBLISH (WRITE PATH) ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Submission rejected before any I/O (missing field, unbound wallet,
    /// publish already in flight).
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// Asset exceeds the upload size ceiling.
    #[error("Asset too large: {size} bytes exceeds the {limit} byte limit")]
    AssetTooLarge {
        /// Actual asset size in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// The signer declined the operation.
    #[error("Rejected by user: {0}")]
    RejectedByUser(String),

    /// Funded balance does not cover the upload cost (Skynet only).
    #[error("Insufficient funds: need {required} base units, have {available}")]
    InsufficientFunds {
        /// Cost of the attempted upload in base units.
        required: u128,
        /// Live balance at check time in base units.
        available: u128,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // FUNDING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No wallet injection present at funding initialization time.
    /// Non-fatal: callers disable funding-dependent features and continue.
    #[error("Wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // READ PATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No chain configuration registered for the requested chain id.
    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),

    /// Contract enumeration failed (node unreachable, bad address, bad
    /// response). Produces no partial list.
    #[error("Chain read failed: {0}")]
    ChainReadError(String),

    /// Metadata document could not be fetched or was not valid JSON.
    #[error("Metadata fetch failed for '{uri}': {reason}")]
    MetadataFetchError {
        /// Token URI whose document failed to resolve.
        uri: String,
        /// Underlying cause.
        reason: String,
    },

    /// Metadata document parsed but required fields are absent.
    #[error("Malformed metadata for '{uri}': missing field '{field}'")]
    MetadataShapeError {
        /// Token URI whose document was malformed.
        uri: String,
        /// First missing required field.
        field: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Transient network failure; the caller may re-submit.
    #[error("Network error: {0}")]
    NetworkError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION / IO
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PinSaveError {
    /// Returns true if this error is transient and the operation may be
    /// retried by the caller. The system itself never retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PinSaveError::NetworkError(_)
                | PinSaveError::ChainReadError(_)
                | PinSaveError::MetadataFetchError { .. }
        )
    }

    /// Returns true if this failure was caught before any I/O was performed.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PinSaveError::InvalidSubmission(_) | PinSaveError::AssetTooLarge { .. }
        )
    }

    /// Returns true if this failure belongs to the aggregation read path.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            PinSaveError::UnsupportedChain(_)
                | PinSaveError::ChainReadError(_)
                | PinSaveError::MetadataFetchError { .. }
                | PinSaveError::MetadataShapeError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PinSaveError::AssetTooLarge {
            size: 6_000_000,
            limit: 5_242_880,
        };
        assert!(err.to_string().contains("6000000"));
        assert!(err.to_string().contains("5242880"));
    }

    #[test]
    fn test_error_classification() {
        assert!(PinSaveError::NetworkError("test".into()).is_recoverable());
        assert!(PinSaveError::ChainReadError("test".into()).is_recoverable());
        assert!(!PinSaveError::InvalidSubmission("test".into()).is_recoverable());

        assert!(PinSaveError::InvalidSubmission("test".into()).is_validation_error());
        assert!(PinSaveError::AssetTooLarge { size: 1, limit: 0 }.is_validation_error());
        assert!(!PinSaveError::NetworkError("test".into()).is_validation_error());

        assert!(PinSaveError::UnsupportedChain(999).is_read_error());
        assert!(!PinSaveError::RejectedByUser("test".into()).is_read_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(PinSaveError::from);
        assert!(matches!(result, Err(PinSaveError::JsonError(_))));
    }
}
