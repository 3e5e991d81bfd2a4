//! Common error types for mend.

use crate::DocumentRef;
use thiserror::Error;

/// Errors reported by a document store adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(DocumentRef),

    /// Document already exists where a fresh one was expected.
    #[error("Document already exists: {0}")]
    AlreadyExists(DocumentRef),

    /// The store could not perform the operation.
    #[error("Store unavailable during {op} on {target}: {reason}")]
    Unavailable {
        op: String,
        target: String,
        reason: String,
    },

    /// Malformed document path.
    #[error("Invalid document reference: {0}")]
    InvalidRef(String),
}

impl StoreError {
    pub fn unavailable(
        op: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            op: op.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_ref(path: impl Into<String>) -> Self {
        Self::InvalidRef(path.into())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
