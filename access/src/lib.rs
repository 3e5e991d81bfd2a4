//! mend Access Control
//!
//! Decides whether an actor may act on a shared resource at a given tier.
//!
//! Responsibilities:
//! - Model the ordered role tiers of each resource family
//! - Hold a resource's sharing configuration (`AccessDescriptor`)
//! - Decode descriptors from stored documents
//! - Evaluate `is_allowed` without side effects

mod descriptor;
mod evaluator;
mod layout;
mod role;

pub use descriptor::{AccessDescriptor, AccessMode};
pub use evaluator::AccessControl;
pub use layout::DescriptorLayout;
pub use role::{DesignRole, ProjectRole, RoleTier};
