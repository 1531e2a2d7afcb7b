//! Live-Variable Analysis
//!
//! Backward dataflow pass answering `live_out(block)`, used by the symbolic
//! execution driver to drop dead symbol bindings at block boundaries. Dead
//! data cannot contribute to state inequality, so this pass is what keeps
//! the explored state space bounded on real code.
//!
//! The engine only depends on the [`ports::LiveVariables`] contract; the
//! bundled [`LiveVariableAnalyzer`] is the default implementation.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::LivenessResult;
pub use infrastructure::LiveVariableAnalyzer;
pub use ports::LiveVariables;
