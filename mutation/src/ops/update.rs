//! Update - patches fields of an existing document.

use mend_core::{patch_from_fields, DocumentRef, FieldPatch, StoreResult};
use mend_store::DocumentStore;

use crate::error::MutationResult;
use crate::expr::Bindings;
use crate::step::MutationStep;

/// Execute an update step and return the updated document.
pub fn execute_update<S: DocumentStore + ?Sized>(
    store: &S,
    index: usize,
    step: &MutationStep,
    bindings: &Bindings,
) -> MutationResult<DocumentRef> {
    let target = bindings.resolve_target(index, &step.target)?;
    let fields = bindings.resolve_payload(&step.forward)?;
    store.update(&target, &patch_from_fields(&fields))?;
    Ok(target)
}

/// Put captured prior values back. Only the fields the step changed are touched.
pub fn restore_fields<S: DocumentStore + ?Sized>(
    store: &S,
    target: &DocumentRef,
    patch: &FieldPatch,
) -> StoreResult<()> {
    if patch.is_empty() {
        return Ok(());
    }
    store.update(target, patch)
}
