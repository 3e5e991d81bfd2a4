//! Transaction plans.

use crate::error::PlanError;
use crate::expr::Target;
use crate::step::{MutationStep, StepKind};
use mend_core::DocumentRef;
use std::collections::HashSet;

/// A validated, ordered sequence of steps.
///
/// Validation guarantees that:
/// - the plan has at least one step
/// - every `Target::Output` and `FieldExpr::AllocatedId` names an earlier Create
/// - no step touches a document an earlier step deleted
/// - documents created by the plan are only addressed through `Target::Output`
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPlan {
    steps: Vec<MutationStep>,
}

/// Identity of a document as far as plan validation can tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DocKey {
    Ref(DocumentRef),
    Created(usize),
}

impl TransactionPlan {
    pub fn new(steps: Vec<MutationStep>) -> Result<Self, PlanError> {
        if steps.is_empty() {
            return Err(PlanError::Empty);
        }

        let mut created: HashSet<DocumentRef> = HashSet::new();
        let mut deleted: HashSet<DocKey> = HashSet::new();

        for (index, step) in steps.iter().enumerate() {
            for dep in step.dependencies() {
                if dep >= index {
                    return Err(PlanError::ForwardReference {
                        step: index,
                        referenced: dep,
                    });
                }
                if steps[dep].kind != StepKind::Create {
                    return Err(PlanError::NotACreate {
                        step: index,
                        referenced: dep,
                    });
                }
            }

            let key = match (&step.kind, &step.target) {
                (StepKind::Create, Target::Output(_)) => {
                    return Err(PlanError::invalid_target(
                        index,
                        "a create cannot target another step's output",
                    ));
                }
                (StepKind::Create, Target::Fixed(doc)) => {
                    if !created.insert(doc.clone()) {
                        return Err(PlanError::invalid_target(
                            index,
                            format!("{} is created twice", doc),
                        ));
                    }
                    Some(DocKey::Ref(doc.clone()))
                }
                (StepKind::Create, Target::Allocate { .. }) => None,
                (_, Target::Allocate { .. }) => {
                    return Err(PlanError::invalid_target(
                        index,
                        "only a create can allocate a new document",
                    ));
                }
                (_, Target::Fixed(doc)) => {
                    if created.contains(doc) {
                        return Err(PlanError::CreatedTargetByRef {
                            step: index,
                            target: doc.clone(),
                        });
                    }
                    Some(DocKey::Ref(doc.clone()))
                }
                (_, Target::Output(source)) => Some(match &steps[*source].target {
                    Target::Fixed(doc) => DocKey::Ref(doc.clone()),
                    _ => DocKey::Created(*source),
                }),
            };

            if let Some(key) = key {
                if deleted.contains(&key) {
                    return Err(PlanError::target_deleted(index, step.target.to_string()));
                }
                if step.kind == StepKind::Delete {
                    deleted.insert(key);
                }
            }
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[MutationStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&MutationStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated plan.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &MutationStep)> {
        self.steps.iter().enumerate()
    }
}
