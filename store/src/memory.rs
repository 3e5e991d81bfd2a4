//! In-memory document store implementation.

use crate::adapter::DocumentStore;
use crate::index::FieldIndex;
use mend_core::{apply_patch, DocumentRef, FieldPatch, Fields, StoreError, StoreResult, Value};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Per-collection ID allocator for `add`.
#[derive(Debug, Default)]
struct IdAllocator {
    next: HashMap<String, u64>,
}

impl IdAllocator {
    fn alloc(&mut self, collection: &str) -> String {
        let next = self.next.entry(collection.to_string()).or_insert(1);
        let id = format!("{}-{}", collection, next);
        *next += 1;
        id
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// collection -> id -> document
    collections: HashMap<String, BTreeMap<String, Fields>>,
    id_alloc: IdAllocator,
    index: FieldIndex,
}

impl StoreState {
    fn get(&self, target: &DocumentRef) -> Option<&Fields> {
        self.collections
            .get(&target.collection)
            .and_then(|docs| docs.get(&target.id))
    }

    fn put(&mut self, target: &DocumentRef, data: Fields) {
        self.remove(target);
        self.index
            .insert_document(&target.collection, &target.id, &data);
        self.collections
            .entry(target.collection.clone())
            .or_default()
            .insert(target.id.clone(), data);
    }

    fn remove(&mut self, target: &DocumentRef) -> Option<Fields> {
        let docs = self.collections.get_mut(&target.collection)?;
        let old = docs.remove(&target.id)?;
        self.index
            .remove_document(&target.collection, &target.id, &old);
        Some(old)
    }

    fn lookup(&self, collection: &str, ids: Vec<String>) -> Vec<(DocumentRef, Fields)> {
        let Some(docs) = self.collections.get(collection) else {
            return Vec::new();
        };
        ids.into_iter()
            .filter_map(|id| {
                docs.get(&id)
                    .map(|fields| (DocumentRef::new(collection, id.clone()), fields.clone()))
            })
            .collect()
    }

    fn scan(
        &self,
        collection: &str,
        matches: impl Fn(&Fields) -> bool,
    ) -> Vec<(DocumentRef, Fields)> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|docs| docs.iter())
            .filter(|(_, fields)| matches(*fields))
            .map(|(id, fields)| (DocumentRef::new(collection, id.clone()), fields.clone()))
            .collect()
    }
}

/// The in-memory document store.
///
/// Every call takes the store lock for its duration, so single-document
/// operations are atomic and callers on different threads serialise.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document directly, bypassing validation.
    pub fn seed(&self, target: DocumentRef, data: Fields) {
        self.state.write().put(&target, data);
    }

    /// Export every document, ordered by reference.
    pub fn snapshot(&self) -> BTreeMap<DocumentRef, Fields> {
        let state = self.state.read();
        state
            .collections
            .iter()
            .flat_map(|(collection, docs)| {
                docs.iter()
                    .map(move |(id, fields)| (DocumentRef::new(collection, id), fields.clone()))
            })
            .collect()
    }

    /// All documents of a collection, ordered by id.
    pub fn collection(&self, collection: &str) -> Vec<(DocumentRef, Fields)> {
        self.state.read().scan(collection, |_| true)
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .collections
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, target: &DocumentRef) -> StoreResult<Option<Fields>> {
        Ok(self.state.read().get(target).cloned())
    }

    fn create(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()> {
        if !target.is_valid() {
            return Err(StoreError::invalid_ref(target.to_string()));
        }
        let mut state = self.state.write();
        if state.get(target).is_some() {
            return Err(StoreError::AlreadyExists(target.clone()));
        }
        state.put(target, data.clone());
        Ok(())
    }

    fn set(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()> {
        if !target.is_valid() {
            return Err(StoreError::invalid_ref(target.to_string()));
        }
        self.state.write().put(target, data.clone());
        Ok(())
    }

    fn update(&self, target: &DocumentRef, patch: &FieldPatch) -> StoreResult<()> {
        let mut state = self.state.write();
        let mut fields = state
            .get(target)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(target.clone()))?;
        apply_patch(&mut fields, patch);
        state.put(target, fields);
        Ok(())
    }

    fn delete(&self, target: &DocumentRef) -> StoreResult<()> {
        self.state.write().remove(target);
        Ok(())
    }

    fn delete_existing(&self, target: &DocumentRef) -> StoreResult<()> {
        self.state
            .write()
            .remove(target)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(target.clone()))
    }

    fn add(&self, collection: &str, data: &Fields) -> StoreResult<DocumentRef> {
        let mut state = self.state.write();
        let target = loop {
            let candidate = DocumentRef::new(collection, state.id_alloc.alloc(collection));
            if state.get(&candidate).is_none() {
                break candidate;
            }
        };
        if !target.is_valid() {
            return Err(StoreError::invalid_ref(target.to_string()));
        }
        state.put(&target, data.clone());
        Ok(target)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>> {
        let state = self.state.read();
        Ok(match state.index.find_exact(collection, field, value) {
            Some(ids) => state.lookup(collection, ids),
            None => state.scan(collection, |fields| fields.get(field) == Some(value)),
        })
    }

    fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>> {
        let state = self.state.read();
        Ok(match state.index.find_containing(collection, field, value) {
            Some(ids) => state.lookup(collection, ids),
            None => state.scan(collection, |fields| {
                fields.get(field).is_some_and(|list| list.list_contains(value))
            }),
        })
    }
}
