//! Targets and payload expressions.
//!
//! A step may depend on a document created earlier in the same plan, whose
//! id is only known once that step has run. `Target::Output` and
//! `FieldExpr::AllocatedId` name such a step; `Bindings` map step indices to
//! the documents they produced so both can be resolved at execution time.

use crate::error::{MutationError, MutationResult};
use mend_core::{DocumentRef, Fields, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The document a step writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// A document whose id is known up front.
    Fixed(DocumentRef),
    /// A new document whose id the store allocates.
    Allocate { collection: String },
    /// The document produced by an earlier Create step.
    Output(usize),
}

impl Target {
    pub fn allocate(collection: impl Into<String>) -> Self {
        Target::Allocate {
            collection: collection.into(),
        }
    }

    /// The referenced step, for `Output` targets.
    pub fn output_step(&self) -> Option<usize> {
        match self {
            Target::Output(step) => Some(*step),
            _ => None,
        }
    }

    pub fn as_fixed(&self) -> Option<&DocumentRef> {
        match self {
            Target::Fixed(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<DocumentRef> for Target {
    fn from(doc: DocumentRef) -> Self {
        Target::Fixed(doc)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Fixed(doc) => write!(f, "{}", doc),
            Target::Allocate { collection } => write!(f, "{}/<new>", collection),
            Target::Output(step) => write!(f, "<output of step {}>", step),
        }
    }
}

/// A field value, possibly depending on an earlier step's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldExpr {
    Value(Value),
    /// The id of the document created by the given step.
    AllocatedId(usize),
    List(Vec<FieldExpr>),
}

impl FieldExpr {
    /// Steps this expression reads from.
    pub fn referenced_steps(&self) -> Vec<usize> {
        match self {
            FieldExpr::Value(_) => Vec::new(),
            FieldExpr::AllocatedId(step) => vec![*step],
            FieldExpr::List(items) => items.iter().flat_map(FieldExpr::referenced_steps).collect(),
        }
    }

    /// The value, if it does not depend on any step.
    pub fn as_literal(&self) -> Option<Value> {
        match self {
            FieldExpr::Value(value) => Some(value.clone()),
            FieldExpr::AllocatedId(_) => None,
            FieldExpr::List(items) => items
                .iter()
                .map(FieldExpr::as_literal)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
        }
    }
}

impl From<Value> for FieldExpr {
    fn from(value: Value) -> Self {
        FieldExpr::Value(value)
    }
}

impl From<&str> for FieldExpr {
    fn from(s: &str) -> Self {
        FieldExpr::Value(Value::from(s))
    }
}

impl From<String> for FieldExpr {
    fn from(s: String) -> Self {
        FieldExpr::Value(Value::from(s))
    }
}

impl From<i64> for FieldExpr {
    fn from(i: i64) -> Self {
        FieldExpr::Value(Value::Int(i))
    }
}

impl From<bool> for FieldExpr {
    fn from(b: bool) -> Self {
        FieldExpr::Value(Value::Bool(b))
    }
}

/// Field expressions of a step's forward write.
pub type Payload = BTreeMap<String, FieldExpr>;

/// Lift concrete fields into a payload.
pub fn payload_from_fields(fields: Fields) -> Payload {
    fields
        .into_iter()
        .map(|(name, value)| (name, FieldExpr::Value(value)))
        .collect()
}

/// Documents produced by the steps executed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    produced: BTreeMap<usize, DocumentRef>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, step: usize, doc: DocumentRef) {
        self.produced.insert(step, doc);
    }

    pub fn get(&self, step: usize) -> Option<&DocumentRef> {
        self.produced.get(&step)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &DocumentRef)> {
        self.produced.iter().map(|(step, doc)| (*step, doc))
    }

    fn lookup(&self, step: usize) -> MutationResult<&DocumentRef> {
        self.get(step).ok_or(MutationError::Unbound { step })
    }

    /// Resolve an existing-document target. `Allocate` has nothing to resolve.
    pub fn resolve_target(&self, step: usize, target: &Target) -> MutationResult<DocumentRef> {
        match target {
            Target::Fixed(doc) => Ok(doc.clone()),
            Target::Output(source) => self.lookup(*source).cloned(),
            Target::Allocate { .. } => Err(MutationError::MissingTarget { step }),
        }
    }

    pub fn resolve_expr(&self, expr: &FieldExpr) -> MutationResult<Value> {
        match expr {
            FieldExpr::Value(value) => Ok(value.clone()),
            FieldExpr::AllocatedId(step) => Ok(Value::String(self.lookup(*step)?.id.clone())),
            FieldExpr::List(items) => items
                .iter()
                .map(|item| self.resolve_expr(item))
                .collect::<MutationResult<Vec<_>>>()
                .map(Value::List),
        }
    }

    pub fn resolve_payload(&self, payload: &Payload) -> MutationResult<Fields> {
        payload
            .iter()
            .map(|(name, expr)| Ok((name.clone(), self.resolve_expr(expr)?)))
            .collect()
    }
}
