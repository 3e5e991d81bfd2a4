//! Mutation steps.
//!
//! A step carries its compensation from the moment it is built. Update and
//! delete steps take the prior document as input, so the inverse is always
//! captured before the forward write can run.

use crate::expr::{payload_from_fields, FieldExpr, Payload, Target};
use mend_core::{FieldPatch, Fields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of write a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Create => write!(f, "create"),
            StepKind::Update => write!(f, "update"),
            StepKind::Delete => write!(f, "delete"),
        }
    }
}

/// How to undo a committed step.
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    /// Remove the document the step created.
    DeleteTarget,
    /// Put the updated fields back; `None` means the field was absent.
    RestoreFields(FieldPatch),
    /// Write back the full snapshot of a deleted document.
    Recreate(Fields),
}

/// One forward write and its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationStep {
    pub kind: StepKind,
    pub target: Target,
    /// Full document for Create, changed fields for Update, empty for Delete.
    pub forward: Payload,
    pub compensation: Compensation,
    /// Human-readable description used in logs.
    pub label: Option<String>,
}

impl MutationStep {
    /// Create a document at `target` (a fixed ref or `Target::Allocate`).
    pub fn create(target: impl Into<Target>, data: Payload) -> Self {
        Self {
            kind: StepKind::Create,
            target: target.into(),
            forward: data,
            compensation: Compensation::DeleteTarget,
            label: None,
        }
    }

    /// Update fields of `target`, restoring them from `prior` on rollback.
    pub fn update(target: impl Into<Target>, prior: &Fields, new: Payload) -> Self {
        let restore = new
            .keys()
            .map(|name| (name.clone(), prior.get(name).cloned()))
            .collect();
        Self {
            kind: StepKind::Update,
            target: target.into(),
            forward: new,
            compensation: Compensation::RestoreFields(restore),
            label: None,
        }
    }

    /// Delete `target`, recreating it from `prior` on rollback.
    pub fn delete(target: impl Into<Target>, prior: Fields) -> Self {
        Self {
            kind: StepKind::Delete,
            target: target.into(),
            forward: Payload::new(),
            compensation: Compensation::Recreate(prior),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Steps this step depends on, through its target or payload.
    pub fn dependencies(&self) -> Vec<usize> {
        let mut deps: Vec<usize> = self
            .target
            .output_step()
            .into_iter()
            .chain(self.forward.values().flat_map(FieldExpr::referenced_steps))
            .collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }
}

impl fmt::Display for MutationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {} ({})", self.kind, self.target, label),
            None => write!(f, "{} {}", self.kind, self.target),
        }
    }
}

/// Create step from concrete fields. Pass `Target::allocate(..)` to let the
/// store pick the id.
pub fn new_create_step(target: impl Into<Target>, data: Fields) -> MutationStep {
    MutationStep::create(target, payload_from_fields(data))
}

/// Update step writing `new` over a document whose current state is `prior`.
pub fn new_update_step(target: impl Into<Target>, prior: &Fields, new: Fields) -> MutationStep {
    MutationStep::update(target, prior, payload_from_fields(new))
}

/// Delete step for a document whose full state is `prior`.
pub fn new_delete_step(target: impl Into<Target>, prior: Fields) -> MutationStep {
    MutationStep::delete(target, prior)
}
