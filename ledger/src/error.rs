//! Error types for the certchain ledger.
//!
//! Storage and persistence failures are errors. Two outcomes that look
//! like failures are not: a fingerprint that was never recorded (search
//! returns `None`) and a chain that fails validation (a
//! [`ValidationReport`](crate::storage::ValidationReport) the caller
//! inspects).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file exists but does not hold a valid block sequence.
    #[error("ledger file {path} is corrupt: {reason}")]
    StorageCorrupt {
        /// Location of the offending file.
        path: PathBuf,
        /// What the parser rejected.
        reason: String,
    },

    /// The ledger file exists but could not be read.
    #[error("ledger file {path} is unavailable: {source}")]
    StorageUnavailable {
        /// Location of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Writing the ledger to durable storage failed. The in-memory chain
    /// has been rolled back to its last persisted state.
    #[error("failed to persist ledger to {path}: {source}")]
    Persistence {
        /// Location the write targeted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Encoding the chain to JSON failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// True for failures that mean the ledger could not be reached at all,
    /// as opposed to a ledger that was read but is damaged.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LedgerError::StorageUnavailable { .. } | LedgerError::Persistence { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_error_names_path_and_reason() {
        let err = LedgerError::StorageCorrupt {
            path: PathBuf::from("/var/ledger.json"),
            reason: "missing field `hash`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/var/ledger.json"));
        assert!(msg.contains("missing field `hash`"));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn persistence_error_is_unavailable() {
        let err = LedgerError::Persistence {
            path: PathBuf::from("ledger.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("read-only"));
    }
}
