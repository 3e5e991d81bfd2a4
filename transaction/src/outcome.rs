//! Execution outcomes.

use crate::error::{TransactionError, TransactionResult};
use mend_mutation::{Bindings, MutationError, StepKind};
use std::fmt;

/// A failed write, forward or compensating.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    /// Index of the step in its plan.
    pub index: usize,
    pub kind: StepKind,
    /// The document the write addressed, as far as it was resolved.
    pub target: String,
    pub error: MutationError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({} {}): {}",
            self.index, self.kind, self.target, self.error
        )
    }
}

/// Result of a fully committed plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitReport {
    /// Documents produced by each step, including allocated ids.
    pub bindings: Bindings,
    pub steps: usize,
}

/// What happened while rolling back a failed plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackReport {
    /// The forward write that stopped the plan.
    pub failure: StepFailure,
    /// Steps whose compensation was attempted, in the order it ran.
    pub compensated: Vec<usize>,
    /// Compensations that failed; their documents may be inconsistent.
    pub failed_compensations: Vec<StepFailure>,
}

/// How bad an outcome is for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Everything committed.
    None,
    /// The plan failed and the store was restored.
    Recovered,
    /// The plan failed and some documents could not be restored.
    Inconsistent,
}

/// Outcome of executing a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Committed(CommitReport),
    RolledBack(RollbackReport),
    PartiallyRolledBack(RollbackReport),
}

impl ExecutionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ExecutionOutcome::Committed(_))
    }

    pub fn commit_report(&self) -> Option<&CommitReport> {
        match self {
            ExecutionOutcome::Committed(report) => Some(report),
            _ => None,
        }
    }

    pub fn rollback_report(&self) -> Option<&RollbackReport> {
        match self {
            ExecutionOutcome::Committed(_) => None,
            ExecutionOutcome::RolledBack(report)
            | ExecutionOutcome::PartiallyRolledBack(report) => Some(report),
        }
    }

    /// The forward write that triggered rollback, if any.
    pub fn forward_failure(&self) -> Option<&StepFailure> {
        self.rollback_report().map(|report| &report.failure)
    }

    /// Indices of steps whose compensation failed, in the order they ran.
    pub fn failed_compensation_indices(&self) -> Vec<usize> {
        self.rollback_report()
            .map(|report| {
                report
                    .failed_compensations
                    .iter()
                    .map(|failure| failure.index)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn severity(&self) -> Severity {
        match self {
            ExecutionOutcome::Committed(_) => Severity::None,
            ExecutionOutcome::RolledBack(_) => Severity::Recovered,
            ExecutionOutcome::PartiallyRolledBack(_) => Severity::Inconsistent,
        }
    }

    /// Status class an HTTP layer should answer with.
    pub fn http_status_class(&self) -> u16 {
        match self {
            ExecutionOutcome::Committed(_) => 200,
            ExecutionOutcome::RolledBack(_) | ExecutionOutcome::PartiallyRolledBack(_) => 500,
        }
    }

    /// Convert into a `Result`, surfacing the most severe error.
    pub fn into_result(self) -> TransactionResult<CommitReport> {
        match self {
            ExecutionOutcome::Committed(report) => Ok(report),
            ExecutionOutcome::RolledBack(report) => Err(TransactionError::ForwardStepFailed {
                step: report.failure.index,
                source: report.failure.error,
            }),
            ExecutionOutcome::PartiallyRolledBack(report) => {
                match report.failed_compensations.into_iter().next() {
                    Some(first) => Err(TransactionError::CompensationFailed {
                        step: first.index,
                        source: first.error,
                    }),
                    None => Err(TransactionError::ForwardStepFailed {
                        step: report.failure.index,
                        source: report.failure.error,
                    }),
                }
            }
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Committed(report) => {
                write!(f, "committed {} steps", report.steps)
            }
            ExecutionOutcome::RolledBack(report) => {
                write!(f, "rolled back after {}", report.failure)
            }
            ExecutionOutcome::PartiallyRolledBack(report) => write!(
                f,
                "partially rolled back after {}; possibly inconsistent steps {:?}",
                report.failure,
                self.failed_compensation_indices()
            ),
        }
    }
}
