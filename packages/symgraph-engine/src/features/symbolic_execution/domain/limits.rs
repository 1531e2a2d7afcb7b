//! Exploration bounds.
//!
//! Three independent counters trade completeness for guaranteed termination
//! on arbitrary input. The numeric values are configuration, not contract:
//! tune them per deployment, keep the three-counter shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationLimits {
    /// Global budget of processed instructions across all paths.
    pub max_steps: usize,
    /// Budget of distinct program states constructed.
    pub max_states: usize,
    /// Per-path visit bound for a single block (loop unrolling limit).
    pub max_block_visits: u32,
}

impl Default for ExplorationLimits {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            max_states: 10_000,
            max_block_visits: 8,
        }
    }
}

impl ExplorationLimits {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn with_max_block_visits(mut self, max_block_visits: u32) -> Self {
        self.max_block_visits = max_block_visits;
        self
    }
}
