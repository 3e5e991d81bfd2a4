//! Fault injection for exercising rollback paths.
//!
//! `FaultyStore` wraps another store and fails selected operations with
//! `StoreError::Unavailable`. A failed write never reaches the inner store.
//! Every write attempt is recorded, so tests can assert on write order.

use crate::adapter::{DocumentStore, StoreOp};
use mend_core::{DocumentRef, FieldPatch, Fields, StoreError, StoreResult, Value};
use parking_lot::Mutex;
use tracing::debug;

/// Which occurrences of a matching operation fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrence {
    /// Only the nth matching call (1-based).
    Nth(usize),
    /// Every matching call.
    Always,
}

/// A rule selecting store calls to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRule {
    op: StoreOp,
    target: Option<DocumentRef>,
    occurrence: Occurrence,
    seen: usize,
}

impl FaultRule {
    /// Fail the first call of the given kind.
    pub fn on(op: StoreOp) -> Self {
        Self {
            op,
            target: None,
            occurrence: Occurrence::Nth(1),
            seen: 0,
        }
    }

    /// Only match calls against this document.
    ///
    /// `Add` calls match on the collection, since their id is not known yet.
    pub fn target(mut self, target: DocumentRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Fail the nth matching call instead of the first.
    pub fn nth(mut self, n: usize) -> Self {
        self.occurrence = Occurrence::Nth(n.max(1));
        self
    }

    /// Fail every matching call.
    pub fn always(mut self) -> Self {
        self.occurrence = Occurrence::Always;
        self
    }

    fn matches(&self, op: StoreOp, collection: &str, target: Option<&DocumentRef>) -> bool {
        if self.op != op {
            return false;
        }
        match (&self.target, target) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(wanted), None) => wanted.collection == collection,
        }
    }

    /// Count a matching call; returns true if this one must fail.
    fn trip(&mut self) -> bool {
        self.seen += 1;
        match self.occurrence {
            Occurrence::Nth(n) => self.seen == n,
            Occurrence::Always => true,
        }
    }
}

/// One write attempt seen by a `FaultyStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub op: StoreOp,
    pub collection: String,
    /// The addressed document; for `Add`, the allocated one if it succeeded.
    pub target: Option<DocumentRef>,
    pub failed: bool,
}

/// A store wrapper that injects failures and logs writes.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    rules: Mutex<Vec<FaultRule>>,
    log: Mutex<Vec<WriteRecord>>,
}

impl<S: DocumentStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            rules: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Register a fault rule.
    pub fn fail_on(&self, rule: FaultRule) -> &Self {
        self.rules.lock().push(rule);
        self
    }

    /// Remove all fault rules. The write log is kept.
    pub fn clear_faults(&self) {
        self.rules.lock().clear();
    }

    /// Write attempts so far, in call order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.log.lock().clone()
    }

    /// Only the write attempts that went through.
    pub fn successful_writes(&self) -> Vec<WriteRecord> {
        self.log
            .lock()
            .iter()
            .filter(|record| !record.failed)
            .cloned()
            .collect()
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(
        &self,
        op: StoreOp,
        collection: &str,
        target: Option<&DocumentRef>,
    ) -> StoreResult<()> {
        let mut rules = self.rules.lock();
        let mut tripped = false;
        for rule in rules.iter_mut() {
            if rule.matches(op, collection, target) && rule.trip() {
                tripped = true;
            }
        }
        if !tripped {
            return Ok(());
        }

        let label = target
            .map(ToString::to_string)
            .unwrap_or_else(|| collection.to_string());
        debug!(%op, target = %label, "injecting store fault");
        Err(StoreError::unavailable(op.to_string(), label, "injected fault"))
    }

    fn record(&self, op: StoreOp, collection: &str, target: Option<DocumentRef>, failed: bool) {
        self.log.lock().push(WriteRecord {
            op,
            collection: collection.to_string(),
            target,
            failed,
        });
    }

    fn write<T>(
        &self,
        op: StoreOp,
        target: &DocumentRef,
        apply: impl FnOnce(&S) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let result = self
            .check(op, &target.collection, Some(target))
            .and_then(|()| apply(&self.inner));
        self.record(op, &target.collection, Some(target.clone()), result.is_err());
        result
    }
}

impl<S: DocumentStore> DocumentStore for FaultyStore<S> {
    fn get(&self, target: &DocumentRef) -> StoreResult<Option<Fields>> {
        self.check(StoreOp::Get, &target.collection, Some(target))?;
        self.inner.get(target)
    }

    fn create(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()> {
        self.write(StoreOp::Create, target, |inner| inner.create(target, data))
    }

    fn set(&self, target: &DocumentRef, data: &Fields) -> StoreResult<()> {
        self.write(StoreOp::Set, target, |inner| inner.set(target, data))
    }

    fn update(&self, target: &DocumentRef, patch: &FieldPatch) -> StoreResult<()> {
        self.write(StoreOp::Update, target, |inner| inner.update(target, patch))
    }

    fn delete(&self, target: &DocumentRef) -> StoreResult<()> {
        self.write(StoreOp::Delete, target, |inner| inner.delete(target))
    }

    fn delete_existing(&self, target: &DocumentRef) -> StoreResult<()> {
        self.write(StoreOp::Delete, target, |inner| inner.delete_existing(target))
    }

    fn add(&self, collection: &str, data: &Fields) -> StoreResult<DocumentRef> {
        let result = self
            .check(StoreOp::Add, collection, None)
            .and_then(|()| self.inner.add(collection, data));
        self.record(
            StoreOp::Add,
            collection,
            result.as_ref().ok().cloned(),
            result.is_err(),
        );
        result
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>> {
        self.check(StoreOp::Query, collection, None)?;
        self.inner.query_by_field(collection, field, value)
    }

    fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(DocumentRef, Fields)>> {
        self.check(StoreOp::Query, collection, None)?;
        self.inner.query_array_contains(collection, field, value)
    }
}
