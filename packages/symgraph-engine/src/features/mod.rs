//! Vertical feature slices.

pub mod live_variables;
pub mod symbolic_execution;
