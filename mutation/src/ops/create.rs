//! Create - writes a new document, at a fixed ref or a store-allocated id.

use mend_core::DocumentRef;
use mend_store::DocumentStore;

use crate::error::{MutationError, MutationResult};
use crate::expr::{Bindings, Target};
use crate::step::MutationStep;

/// Execute a create step and return the created document.
pub fn execute_create<S: DocumentStore + ?Sized>(
    store: &S,
    index: usize,
    step: &MutationStep,
    bindings: &Bindings,
) -> MutationResult<DocumentRef> {
    let data = bindings.resolve_payload(&step.forward)?;
    match &step.target {
        Target::Fixed(doc) => {
            // An existing document is never overwritten; its rollback
            // would delete it.
            store.create(doc, &data)?;
            Ok(doc.clone())
        }
        Target::Allocate { collection } => Ok(store.add(collection, &data)?),
        Target::Output(_) => Err(MutationError::MissingTarget { step: index }),
    }
}
