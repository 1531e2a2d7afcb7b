//! Common model types (CFG, instructions, symbols)
//!
//! These are shared across features, so they live in shared/models to avoid
//! circular dependencies between the vertical slices.

pub mod cfg;
pub mod instruction;
pub mod symbol;

pub use cfg::{Block, BlockId, CfgBuilder, ControlFlowGraph, Edge, EdgeLabel};
pub use instruction::{BooleanOp, Instruction, JumpKind, LiteralValue};
pub use symbol::{SymbolId, SymbolInfo, SymbolKind, SymbolTable};
