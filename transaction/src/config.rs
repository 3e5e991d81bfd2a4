//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on plan length.
pub const DEFAULT_MAX_PLAN_STEPS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Read each document back after compensating it and count a mismatch
    /// as a failed compensation.
    pub verify_compensations: bool,
    /// Largest plan a builder may produce.
    pub max_plan_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verify_compensations: false,
            max_plan_steps: DEFAULT_MAX_PLAN_STEPS,
        }
    }
}
