//! Delete - removes a document.

use mend_core::DocumentRef;
use mend_store::DocumentStore;

use crate::error::MutationResult;
use crate::expr::Bindings;
use crate::step::MutationStep;

/// Execute a delete step and return the deleted document.
pub fn execute_delete<S: DocumentStore + ?Sized>(
    store: &S,
    index: usize,
    step: &MutationStep,
    bindings: &Bindings,
) -> MutationResult<DocumentRef> {
    let target = bindings.resolve_target(index, &step.target)?;
    // Fails on an absent document, so rollback never recreates one.
    store.delete_existing(&target)?;
    Ok(target)
}
