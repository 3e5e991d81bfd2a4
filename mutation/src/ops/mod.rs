//! Store writes for each step kind.
//!
//! Forward writes and compensations are type-correct per kind: a create is
//! undone with `delete`, an update with a field-level `update`, and a delete
//! with a full `set` of the captured snapshot. Forward writes are strict
//! where compensations are not: a fixed-ref create fails on an existing
//! document and a delete fails on an absent one.

mod create;
mod delete;
mod update;

use mend_core::DocumentRef;
use mend_store::DocumentStore;

use crate::error::MutationResult;
use crate::expr::Bindings;
use crate::step::{Compensation, MutationStep, StepKind};

pub use create::execute_create;
pub use delete::execute_delete;
pub use update::{execute_update, restore_fields};

/// Apply the forward write of step `index`, returning the document written.
pub fn apply_forward<S: DocumentStore + ?Sized>(
    store: &S,
    index: usize,
    step: &MutationStep,
    bindings: &Bindings,
) -> MutationResult<DocumentRef> {
    match step.kind {
        StepKind::Create => execute_create(store, index, step, bindings),
        StepKind::Update => execute_update(store, index, step, bindings),
        StepKind::Delete => execute_delete(store, index, step, bindings),
    }
}

/// Undo a committed step against its resolved target.
pub fn apply_compensation<S: DocumentStore + ?Sized>(
    store: &S,
    target: &DocumentRef,
    compensation: &Compensation,
) -> MutationResult<()> {
    match compensation {
        Compensation::DeleteTarget => store.delete(target)?,
        Compensation::RestoreFields(patch) => restore_fields(store, target, patch)?,
        Compensation::Recreate(snapshot) => store.set(target, snapshot)?,
    }
    Ok(())
}

/// Returns true if the store reflects a completed compensation.
pub fn compensation_holds<S: DocumentStore + ?Sized>(
    store: &S,
    target: &DocumentRef,
    compensation: &Compensation,
) -> MutationResult<bool> {
    let current = store.get(target)?;
    Ok(match compensation {
        Compensation::DeleteTarget => current.is_none(),
        Compensation::RestoreFields(patch) => current.is_some_and(|fields| {
            patch
                .iter()
                .all(|(name, value)| fields.get(name) == value.as_ref())
        }),
        Compensation::Recreate(snapshot) => current.as_ref() == Some(snapshot),
    })
}
