//! Access evaluation.

use crate::descriptor::{AccessDescriptor, AccessMode};
use crate::role::RoleTier;

/// Stateless access-control evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl;

impl AccessControl {
    /// Returns true if `actor` may act on the resource at `required`.
    ///
    /// A public descriptor grants its public tier to everyone; listed
    /// members may still hold a higher tier than the public one.
    pub fn is_allowed<R: RoleTier>(
        descriptor: &AccessDescriptor<R>,
        actor: &str,
        required: R,
    ) -> bool {
        if descriptor.mode == AccessMode::Public
            && descriptor.public_role.is_some_and(|tier| tier >= required)
        {
            return true;
        }
        descriptor.tier_of(actor).is_some_and(|tier| tier >= required)
    }
}
