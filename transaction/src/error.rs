//! Transaction error types.

use mend_core::DocumentRef;
use mend_mutation::{MutationError, PlanError};
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    /// A document needed to build or check the plan does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(DocumentRef),

    /// The actor lacks the required tier.
    #[error("permission denied: {actor} needs {required}")]
    PermissionDenied { actor: String, required: String },

    /// A forward write failed; the plan was rolled back.
    #[error("step {step} failed: {source}")]
    ForwardStepFailed {
        step: usize,
        #[source]
        source: MutationError,
    },

    /// A rollback write failed; the target may be inconsistent.
    #[error("compensation of step {step} failed: {source}")]
    CompensationFailed {
        step: usize,
        #[source]
        source: MutationError,
    },

    /// The steps do not form a valid plan.
    #[error("invalid plan: {0}")]
    InvalidPlan(#[from] PlanError),
}

impl TransactionError {
    pub fn permission_denied(actor: impl Into<String>, required: impl Into<String>) -> Self {
        Self::PermissionDenied {
            actor: actor.into(),
            required: required.into(),
        }
    }

    /// Returns true if the error leaves documents possibly inconsistent.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, TransactionError::CompensationFailed { .. })
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
