//! Symbolic Execution
//!
//! Bounded exploration of the exploded graph of one function body: every
//! feasible path through the CFG, tracked with symbolic values and
//! per-value constraints, pruned where constraints contradict, cut by
//! explicit step, state and loop-visit bounds. Consumers iterate the event
//! stream of a [`Walk`](application::Walk) and draw their own conclusions;
//! the engine asserts no diagnostics of its own.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{Explorer, Walk};
pub use domain::{
    AbortReason, AnalysisEvent, Constraint, ConstraintDomain, ConstraintSet, ExplorationLimits,
    ExplorationStatus, Nullness, ProgramPoint, ProgramState, SymbolicValue, ValueFactory,
};
pub use ports::SymbolResolver;
