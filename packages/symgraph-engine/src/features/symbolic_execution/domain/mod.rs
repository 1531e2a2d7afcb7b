//! Domain model of the symbolic execution engine: values, constraints,
//! program states, program points, events and bounds.

pub mod constraint;
pub mod event;
pub mod limits;
pub mod program_point;
pub mod program_state;
pub mod symbolic_value;

pub use constraint::{Constraint, ConstraintDomain, ConstraintSet, Nullness};
pub use event::{AbortReason, AnalysisEvent, ExplorationStatus};
pub use limits::ExplorationLimits;
pub use program_point::ProgramPoint;
pub use program_state::ProgramState;
pub use symbolic_value::{SymbolicValue, ValueFactory};
