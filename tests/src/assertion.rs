//! Store assertions.

use std::collections::{BTreeMap, BTreeSet};

use mend_core::{DocumentRef, Fields};
use mend_mutation::TransactionPlan;
use mend_store::DocumentStore;

/// Assert that `doc` exists with exactly `expected`.
pub fn assert_doc<S: DocumentStore + ?Sized>(store: &S, doc: &DocumentRef, expected: &Fields) {
    match store.get(doc) {
        Ok(Some(actual)) => pretty_assertions::assert_eq!(&actual, expected, "document {}", doc),
        Ok(None) => panic!("document {} is missing", doc),
        Err(e) => panic!("reading {} failed: {}", doc, e),
    }
}

/// Assert that `doc` does not exist.
pub fn assert_missing<S: DocumentStore + ?Sized>(store: &S, doc: &DocumentRef) {
    match store.get(doc) {
        Ok(None) => {}
        Ok(Some(actual)) => panic!("document {} still exists: {:?}", doc, actual),
        Err(e) => panic!("reading {} failed: {}", doc, e),
    }
}

/// Fixed-ref documents a plan touches.
pub fn touched(plan: &TransactionPlan) -> BTreeSet<DocumentRef> {
    plan.steps()
        .iter()
        .filter_map(|step| step.target.as_fixed().cloned())
        .collect()
}

/// Assert every document in `docs` matches its state in `before`, where a
/// document absent from `before` must be absent now.
pub fn assert_restored<'a, S: DocumentStore + ?Sized>(
    store: &S,
    before: &BTreeMap<DocumentRef, Fields>,
    docs: impl IntoIterator<Item = &'a DocumentRef>,
) {
    for doc in docs {
        match before.get(doc) {
            Some(expected) => assert_doc(store, doc, expected),
            None => assert_missing(store, doc),
        }
    }
}
