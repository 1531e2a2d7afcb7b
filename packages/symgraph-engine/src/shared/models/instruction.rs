//! Closed instruction set consumed by the transfer functions.
//!
//! The front end flattens expressions into evaluation order before building
//! the CFG, so every instruction here has a fixed stack effect. Dispatch is
//! an exhaustive match in the transfer layer; adding a kind is a compile
//! error until every consumer handles it.

use serde::{Deserialize, Serialize};

use super::symbol::SymbolId;

/// Literal operand of a `Literal` instruction.
///
/// `True`, `False` and `Null` map to the canonical singleton symbolic
/// values; every other literal (numbers, strings, ...) is `Constant` and
/// produces a fresh non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralValue {
    True,
    False,
    Null,
    Constant,
}

/// Boolean binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    /// `&&` (short-circuit)
    AndAlso,
    /// `||` (short-circuit)
    OrElse,
    /// `&` (eager)
    And,
    /// `|` (eager)
    Or,
    /// `^` (eager)
    Xor,
}

impl BooleanOp {
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BooleanOp::AndAlso | BooleanOp::OrElse)
    }

    /// Truth table for the eagerly evaluated forms; short-circuit forms
    /// share the table with their eager counterparts.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BooleanOp::AndAlso | BooleanOp::And => lhs && rhs,
            BooleanOp::OrElse | BooleanOp::Or => lhs || rhs,
            BooleanOp::Xor => lhs ^ rhs,
        }
    }
}

/// Jump kinds that terminate normal flow within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Return,
    Throw,
    Break,
    Continue,
    Yield,
}

/// One flattened instruction.
///
/// Stack effects (pops / pushes):
/// - `Literal`: 0 / 1
/// - `IdentifierRead`: 0 / 1 (first read binds the symbol-derived value)
/// - `Assignment`: 1 / 1 (assignment is itself an expression)
/// - `LogicalNot`: 1 / 1
/// - `BooleanBinary`: 2 / 1
/// - `Equality`: 2 / 1
/// - `NullCoalesce`: 2 / 1
/// - `IsPattern`, `Upcast`: 1 / 1
/// - `MemberAccess`: 1 / 1
/// - `Invocation`: args (+1 receiver) / 1
/// - `CatchEntry`: 0 / 0 (binds the caught exception symbol)
/// - `Discard`: 1 / 0 (expression-statement result)
/// - `Jump`: 0 / 0
/// - `Opaque`: pops / 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Literal(LiteralValue),
    IdentifierRead(SymbolId),
    Assignment(SymbolId),
    LogicalNot,
    BooleanBinary(BooleanOp),
    Equality { negated: bool },
    /// `??` when `assign` is `None`, `??=` when it names the target symbol.
    NullCoalesce { assign: Option<SymbolId> },
    /// `is` pattern test; forks into matched / not-matched outcomes.
    IsPattern,
    /// A cast that cannot fail at runtime.
    Upcast,
    /// Member or element access on the value at the top of the stack.
    MemberAccess,
    Invocation {
        callee: Option<SymbolId>,
        args: u32,
        receiver: bool,
    },
    /// First instruction of a catch block; binds the caught exception.
    CatchEntry(SymbolId),
    Discard,
    Jump(JumpKind),
    /// Unrecognized source construct: consumes its operands, produces an
    /// unconstrained value. The degradation path for syntax the front end
    /// cannot model.
    Opaque { pops: u32 },
}

impl Instruction {
    /// Jump instructions end the block; nothing after them executes.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Jump(_))
    }

    /// Symbol read by this instruction, for live-variable analysis.
    pub fn reads(&self) -> Option<SymbolId> {
        match self {
            Instruction::IdentifierRead(s) => Some(*s),
            _ => None,
        }
    }

    /// Symbol written by this instruction, for live-variable analysis.
    pub fn writes(&self) -> Option<SymbolId> {
        match self {
            Instruction::Assignment(s) | Instruction::CatchEntry(s) => Some(*s),
            Instruction::NullCoalesce { assign: Some(s) } => Some(*s),
            _ => None,
        }
    }
}
