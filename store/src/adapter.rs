//! The document store adapter interface.

use mend_core::{DocumentRef, FieldPatch, Fields, StoreResult, Value};
use std::fmt;

/// Kind of store operation, used for fault matching and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Create,
    Set,
    Update,
    Delete,
    Add,
    Query,
}

impl StoreOp {
    /// Returns true if this operation writes to the store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            StoreOp::Create | StoreOp::Set | StoreOp::Update | StoreOp::Delete | StoreOp::Add
        )
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::Get => "get",
            StoreOp::Create => "create",
            StoreOp::Set => "set",
            StoreOp::Update => "update",
            StoreOp::Delete => "delete",
            StoreOp::Add => "add",
            StoreOp::Query => "query",
        };
        f.write_str(name)
    }
}

/// A multi-collection document store.
///
/// Each call is atomic for the single document it touches. Nothing is
/// promised across documents; that is what the transaction engine layers on.
pub trait DocumentStore: Send + Sync {
    /// Read a document. `Ok(None)` if it does not exist.
    fn get(&self, target: &DocumentRef) -> StoreResult<Option<Fields>>;

    /// Create a document that must not exist yet. Fails with
    /// `AlreadyExists` otherwise, leaving the stored document untouched.
    fn create(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()>;

    /// Create or overwrite a document with the full field set.
    fn set(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()>;

    /// Patch fields of an existing document. Fails with `NotFound` if absent.
    fn update(&self, target: &DocumentRef, patch: &FieldPatch) -> StoreResult<()>;

    /// Delete a document. Deleting an absent document succeeds.
    fn delete(&self, target: &DocumentRef) -> StoreResult<()>;

    /// Delete a document that must exist. Fails with `NotFound` otherwise.
    fn delete_existing(&self, target: &DocumentRef) -> StoreResult<()>;

    /// Create a document under a store-allocated id.
    fn add(&self, collection: &str, data: &Fields) -> StoreResult<DocumentRef>;

    /// Find documents whose `field` equals `value`.
    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>>;

    /// Find documents whose list `field` holds an element equal to `value`.
    fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>>;

    /// Returns true if the document exists.
    fn exists(&self, target: &DocumentRef) -> StoreResult<bool> {
        Ok(self.get(target)?.is_some())
    }
}
