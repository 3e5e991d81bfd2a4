//! mend integration test support.
//!
//! - `fixture` - JSON fixtures loaded into a `MemoryStore`
//! - `assertion` - store-level assertions for rollback checks

pub mod assertion;
mod error;

pub use error::{FixtureError, FixtureResult};

/// Everything a scenario suite needs.
pub mod prelude {
    pub use crate::assertion::{assert_doc, assert_missing, assert_restored, touched};
    pub use crate::fixture::{faulty_store, Fixture};
    pub use mend_access::{
        AccessControl, AccessDescriptor, AccessMode, DescriptorLayout, DesignRole, ProjectRole,
        RoleTier,
    };
    pub use mend_core::{fields, list, DocumentRef, FieldPatch, Fields, Value};
    pub use mend_mutation::{
        new_create_step, new_delete_step, new_update_step, payload_from_fields, FieldExpr,
        MutationStep, Payload, StepKind, Target, TransactionPlan,
    };
    pub use mend_planner::flows::{self, ChildLink, ParentLink, ShareRequest};
    pub use mend_planner::{BuildError, PlanBuilder};
    pub use mend_session::{Config, Session};
    pub use mend_store::{DocumentStore, FaultRule, FaultyStore, MemoryStore, StoreOp};
    pub use mend_transaction::{
        EngineConfig, ExecutionOutcome, Severity, TransactionEngine, TransactionError,
    };
}
