//! Plan builder.
//!
//! The builder reads documents through a plan-local view: writes already
//! planned are overlaid on what the store returned, and documents deleted
//! earlier in the plan read as absent. Compensations are always built from
//! that view, so undoing the steps in reverse walks the document back to
//! its pre-transaction state.
//!
//! Queries (`find_by_field`, `find_containing`) go to the store and only
//! drop documents the plan deletes; they do not see planned field changes.

use std::collections::{BTreeMap, HashMap, HashSet};

use mend_access::{AccessControl, AccessDescriptor, RoleTier};
use mend_core::{DocumentRef, Fields, StoreError, Value};
use mend_mutation::{FieldExpr, MutationStep, Payload, PlanError, Target, TransactionPlan};
use mend_store::DocumentStore;
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// Handle to a document created by the plan under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepHandle {
    step: usize,
}

impl StepHandle {
    /// Index of the creating step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Target for later steps writing to the created document.
    pub fn target(&self) -> Target {
        Target::Output(self.step)
    }

    /// The created document's id, resolved at execution time.
    pub fn id(&self) -> FieldExpr {
        FieldExpr::AllocatedId(self.step)
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Live(Payload),
    Deleted,
}

/// Assembles a `TransactionPlan` for one request.
pub struct PlanBuilder<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    max_steps: usize,
    steps: Vec<MutationStep>,
    /// Store contents as first read, per document.
    originals: HashMap<DocumentRef, Option<Fields>>,
    /// Planned changes to existing documents.
    pending: HashMap<DocumentRef, Pending>,
    /// Payloads of documents the plan creates, by creating step.
    created: BTreeMap<usize, Payload>,
    created_refs: HashSet<DocumentRef>,
}

impl<'s, S: DocumentStore + ?Sized> PlanBuilder<'s, S> {
    pub fn new(store: &'s S, max_steps: usize) -> Self {
        Self {
            store,
            max_steps,
            steps: Vec::new(),
            originals: HashMap::new(),
            pending: HashMap::new(),
            created: BTreeMap::new(),
            created_refs: HashSet::new(),
        }
    }

    /// Number of steps planned so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    // ========== Checks and reads ==========

    /// Fail with `PermissionDenied` unless `actor` holds `required`.
    pub fn require_access<R: RoleTier>(
        &self,
        descriptor: &AccessDescriptor<R>,
        actor: &str,
        required: R,
    ) -> BuildResult<()> {
        if AccessControl::is_allowed(descriptor, actor, required) {
            return Ok(());
        }
        debug!(actor, ?required, "access denied");
        Err(BuildError::permission_denied(actor, format!("{:?}", required)))
    }

    /// Read a document as the plan would leave it so far.
    pub fn load(&mut self, doc: &DocumentRef) -> BuildResult<Fields> {
        self.current(doc)?
            .ok_or_else(|| BuildError::ResourceNotFound(doc.clone()))
    }

    /// Documents of `collection` whose `field` equals `value`.
    pub fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BuildResult<Vec<DocumentRef>> {
        let found = self.store.query_by_field(collection, field, value)?;
        Ok(self.live_refs(found))
    }

    /// Documents of `collection` whose list `field` holds `value`.
    pub fn find_containing(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BuildResult<Vec<DocumentRef>> {
        let found = self.store.query_array_contains(collection, field, value)?;
        Ok(self.live_refs(found))
    }

    // ========== Steps ==========

    /// Create a document under a store-allocated id.
    pub fn create(&mut self, collection: &str, data: Payload) -> BuildResult<StepHandle> {
        let step = self.push(MutationStep::create(Target::allocate(collection), data.clone()))?;
        self.created.insert(step, data);
        Ok(StepHandle { step })
    }

    /// Create a document at a known id. The document must not exist yet.
    pub fn create_at(&mut self, doc: &DocumentRef, data: Payload) -> BuildResult<StepHandle> {
        if self.created_refs.contains(doc) || self.current(doc)?.is_some() {
            return Err(StoreError::AlreadyExists(doc.clone()).into());
        }
        let step = self.push(MutationStep::create(doc.clone(), data.clone()))?;
        self.created.insert(step, data);
        self.created_refs.insert(doc.clone());
        Ok(StepHandle { step })
    }

    /// Update fields of an existing document.
    pub fn update(&mut self, doc: &DocumentRef, new: Payload) -> BuildResult<()> {
        self.update_labeled(doc, new, None)
    }

    /// Update fields of a document created earlier in this plan.
    pub fn update_created(&mut self, handle: StepHandle, new: Payload) -> BuildResult<()> {
        let referenced = handle.step;
        let Some(payload) = self.created.get(&referenced) else {
            return Err(PlanError::NotACreate {
                step: self.steps.len(),
                referenced,
            }
            .into());
        };
        // Fields holding unresolved ids restore to absent; the create's own
        // compensation removes the document anyway.
        let prior: Fields = payload
            .iter()
            .filter_map(|(name, expr)| expr.as_literal().map(|value| (name.clone(), value)))
            .collect();
        self.push(MutationStep::update(handle.target(), &prior, new.clone()))?;
        if let Some(payload) = self.created.get_mut(&referenced) {
            payload.extend(new);
        }
        Ok(())
    }

    /// Append `item` to the list `field` of `doc`.
    pub fn append_to_list(
        &mut self,
        doc: &DocumentRef,
        field: &str,
        item: FieldExpr,
    ) -> BuildResult<()> {
        let mut items = list_items(self.pending_expr(doc, field)?);
        items.push(item);
        let mut new = Payload::new();
        new.insert(field.to_string(), FieldExpr::List(items));
        self.update_labeled(doc, new, Some(format!("append to {}", field)))
    }

    /// Remove every element equal to `value` from the list `field` of `doc`.
    ///
    /// Returns false, planning nothing, if the list does not hold `value`.
    pub fn remove_from_list(
        &mut self,
        doc: &DocumentRef,
        field: &str,
        value: &Value,
    ) -> BuildResult<bool> {
        let mut items = list_items(self.pending_expr(doc, field)?);
        let before = items.len();
        items.retain(|item| item.as_literal().as_ref() != Some(value));
        if items.len() == before {
            return Ok(false);
        }
        let mut new = Payload::new();
        new.insert(field.to_string(), FieldExpr::List(items));
        self.update_labeled(doc, new, Some(format!("remove from {}", field)))?;
        Ok(true)
    }

    /// Delete an existing document, keeping its snapshot for rollback.
    pub fn delete(&mut self, doc: &DocumentRef) -> BuildResult<()> {
        let prior = self.load(doc)?;
        self.push(MutationStep::delete(doc.clone(), prior))?;
        self.pending.insert(doc.clone(), Pending::Deleted);
        Ok(())
    }

    /// Validate and return the plan.
    pub fn build(self) -> BuildResult<TransactionPlan> {
        Ok(TransactionPlan::new(self.steps)?)
    }

    // ========== Internals ==========

    fn push(&mut self, step: MutationStep) -> BuildResult<usize> {
        if self.steps.len() >= self.max_steps {
            return Err(BuildError::TooManySteps {
                limit: self.max_steps,
            });
        }
        self.steps.push(step);
        Ok(self.steps.len() - 1)
    }

    fn update_labeled(
        &mut self,
        doc: &DocumentRef,
        new: Payload,
        label: Option<String>,
    ) -> BuildResult<()> {
        let prior = self.load(doc)?;
        let mut step = MutationStep::update(doc.clone(), &prior, new.clone());
        step.label = label;
        self.push(step)?;
        if let Pending::Live(overlay) = self
            .pending
            .entry(doc.clone())
            .or_insert_with(|| Pending::Live(Payload::new()))
        {
            overlay.extend(new);
        }
        Ok(())
    }

    fn original(&mut self, doc: &DocumentRef) -> BuildResult<Option<Fields>> {
        if let Some(cached) = self.originals.get(doc) {
            return Ok(cached.clone());
        }
        let fetched = self.store.get(doc)?;
        self.originals.insert(doc.clone(), fetched.clone());
        Ok(fetched)
    }

    fn current(&mut self, doc: &DocumentRef) -> BuildResult<Option<Fields>> {
        if matches!(self.pending.get(doc), Some(Pending::Deleted)) {
            return Ok(None);
        }
        let original = self.original(doc)?;
        let Some(Pending::Live(overlay)) = self.pending.get(doc) else {
            return Ok(original);
        };
        let mut fields = original.unwrap_or_default();
        for (name, expr) in overlay {
            // Unresolved ids keep the stored value
            if let Some(value) = expr.as_literal() {
                fields.insert(name.clone(), value);
            }
        }
        Ok(Some(fields))
    }

    fn pending_expr(&mut self, doc: &DocumentRef, field: &str) -> BuildResult<Option<FieldExpr>> {
        if let Some(Pending::Live(overlay)) = self.pending.get(doc) {
            if let Some(expr) = overlay.get(field) {
                return Ok(Some(expr.clone()));
            }
        }
        let fields = self.load(doc)?;
        Ok(fields.get(field).cloned().map(FieldExpr::Value))
    }

    fn live_refs(&self, found: Vec<(DocumentRef, Fields)>) -> Vec<DocumentRef> {
        found
            .into_iter()
            .map(|(doc, _)| doc)
            .filter(|doc| !matches!(self.pending.get(doc), Some(Pending::Deleted)))
            .collect()
    }
}

fn list_items(expr: Option<FieldExpr>) -> Vec<FieldExpr> {
    match expr {
        Some(FieldExpr::List(items)) => items,
        Some(FieldExpr::Value(Value::List(values))) => {
            values.into_iter().map(FieldExpr::Value).collect()
        }
        _ => Vec::new(),
    }
}
