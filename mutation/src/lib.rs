//! mend Mutation
//!
//! The mutation model: steps, their compensations and ordered plans.
//!
//! Responsibilities:
//! - Describe one forward write together with its inverse
//! - Validate plan ordering and intra-plan references
//! - Resolve store-allocated ids into later steps' payloads
//! - Apply forward writes and compensations against a store
//!
//! # Module Structure
//!
//! - `expr` - Targets, payload expressions and bindings
//! - `step` - `MutationStep` and its constructors
//! - `plan` - `TransactionPlan` and its validation
//! - `ops/` - Store writes per step kind (create, update, delete)
//! - `error` - Error types for planning and applying mutations

mod error;
mod expr;
pub mod ops;
mod plan;
mod step;

pub use error::{MutationError, MutationResult, PlanError};
pub use expr::{payload_from_fields, Bindings, FieldExpr, Payload, Target};
pub use plan::TransactionPlan;
pub use step::{
    new_create_step, new_delete_step, new_update_step, Compensation, MutationStep, StepKind,
};
