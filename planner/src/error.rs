//! Plan building error types.

use mend_core::{DocumentRef, StoreError};
use mend_mutation::PlanError;
use thiserror::Error;

/// Errors raised while building a plan. None of them leave writes behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(DocumentRef),

    #[error("Permission denied: {actor} needs {required}")]
    PermissionDenied { actor: String, required: String },

    #[error("Invalid plan: {0}")]
    Plan(#[from] PlanError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Plan exceeds {limit} steps")]
    TooManySteps { limit: usize },
}

impl BuildError {
    pub fn permission_denied(actor: impl Into<String>, required: impl Into<String>) -> Self {
        Self::PermissionDenied {
            actor: actor.into(),
            required: required.into(),
        }
    }
}

/// Result type for plan building.
pub type BuildResult<T> = Result<T, BuildError>;
