//! Mutation error types.

use mend_core::{DocumentRef, StoreError};
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while applying a step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Step {step} has not produced a document yet")]
    Unbound { step: usize },

    #[error("Step {step} has no target it can write to")]
    MissingTarget { step: usize },
}

impl MutationError {
    /// The underlying store error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            MutationError::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// Reasons a sequence of steps is not a valid plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Plan has no steps")]
    Empty,

    #[error("Step {step} refers to step {referenced}, which does not run before it")]
    ForwardReference { step: usize, referenced: usize },

    #[error("Step {step} refers to step {referenced}, which does not create a document")]
    NotACreate { step: usize, referenced: usize },

    #[error("Step {step} has an invalid target: {reason}")]
    InvalidTarget { step: usize, reason: String },

    #[error("Step {step} targets {target}, which an earlier step deletes")]
    TargetDeleted { step: usize, target: String },

    #[error("Step {step} addresses {target} by reference, but it is created in this plan")]
    CreatedTargetByRef { step: usize, target: DocumentRef },
}

impl PlanError {
    pub fn invalid_target(step: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            step,
            reason: reason.into(),
        }
    }

    pub fn target_deleted(step: usize, target: impl Into<String>) -> Self {
        Self::TargetDeleted {
            step,
            target: target.into(),
        }
    }
}
