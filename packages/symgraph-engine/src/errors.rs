//! Error types for symgraph-engine
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for engine operations.
///
/// Every variant is an engine fault, never a user-facing diagnostic: the
/// exploration driver converts these into an `Aborted` terminal status and
/// the caller sees no partial result from the failing function body.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A transfer function popped more values than the front end staged.
    /// This is a contract violation between CFG construction and the
    /// instruction stack discipline, i.e. an engine bug.
    #[error("value stack underflow while applying {0}")]
    StackUnderflow(&'static str),

    /// The CFG violates a structural invariant (dangling edge target,
    /// branch block without both labeled successors, missing entry).
    #[error("malformed control flow graph: {0}")]
    MalformedCfg(String),
}

impl EngineError {
    /// Create a malformed-CFG error
    pub fn malformed_cfg(msg: impl Into<String>) -> Self {
        EngineError::MalformedCfg(msg.into())
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
