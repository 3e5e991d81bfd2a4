//! Execution record for tracking committed steps.

use mend_core::DocumentRef;
use mend_mutation::{Compensation, StepKind};

/// A step whose forward write has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    /// Index of the step in its plan.
    pub index: usize,
    pub kind: StepKind,
    /// The document actually written (allocated ids resolved).
    pub target: DocumentRef,
    /// The inverse to run on rollback.
    pub compensation: Compensation,
}

/// Ordered log of committed steps for one plan execution.
///
/// Lives from the start of `execute` until the plan commits or its
/// compensation pass ends.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRecord {
    entries: Vec<RecordEntry>,
}

impl ExecutionRecord {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed step.
    pub fn commit(
        &mut self,
        index: usize,
        kind: StepKind,
        target: DocumentRef,
        compensation: Compensation,
    ) {
        self.entries.push(RecordEntry {
            index,
            kind,
            target,
            compensation,
        });
    }

    /// Committed steps, most recent first.
    pub fn rollback_order(&self) -> impl Iterator<Item = &RecordEntry> {
        self.entries.iter().rev()
    }

    /// Committed steps in commit order.
    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
