/*
 * Symgraph Engine - Bounded Symbolic Execution over Control-Flow Graphs
 *
 * Feature-First Hexagonal Architecture:
 * - shared/   : Common models (CFG, instructions, symbols)
 * - features/ : Vertical slices (live_variables, symbolic_execution)
 *
 * The engine explores every feasible path through one function body as an
 * exploded graph, prunes paths whose constraints contradict, and terminates
 * on arbitrary input through explicit step, state and loop-visit bounds.
 * Consumers subscribe to the event stream; the engine reports facts, never
 * diagnostics.
 */

#![allow(clippy::match_like_matches_macro)] // Match for readability
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Error types shared across the crate
pub mod errors;
/// Vertical feature slices
pub mod features;
/// Shared models and utilities
pub mod shared;

pub use errors::{EngineError, Result};

pub use shared::models::{
    Block, BlockId, BooleanOp, CfgBuilder, ControlFlowGraph, Edge, EdgeLabel, Instruction,
    JumpKind, LiteralValue, SymbolId, SymbolInfo, SymbolKind, SymbolTable,
};

pub use features::live_variables::{LiveVariableAnalyzer, LiveVariables, LivenessResult};
pub use features::symbolic_execution::{
    AbortReason, AnalysisEvent, Constraint, ConstraintDomain, ConstraintSet, Explorer,
    ExplorationLimits, ExplorationStatus, Nullness, ProgramPoint, ProgramState, SymbolResolver,
    SymbolicValue, ValueFactory, Walk,
};
