//! mend Planner
//!
//! Builds transaction plans for business actions.
//!
//! Responsibilities:
//! - Gate plans on access control before anything is written
//! - Read every document before building its compensation
//! - Propagate store-allocated ids into later steps
//! - Provide the recurring create/link, detach/delete and share flows

mod builder;
mod error;
pub mod flows;

pub use builder::{PlanBuilder, StepHandle};
pub use error::{BuildError, BuildResult};
