//! Per-instruction transfer functions.
//!
//! Each function is pure: `(prior state, instruction) -> 0..=2 successor
//! states`. Zero successors means the instruction is statically infeasible
//! from this state; two means the instruction forks feasibility (short
//! circuits, equality outcomes, null coalescing). Dispatch is one exhaustive
//! match; adding an instruction kind fails compilation until handled here.
//!
//! Transfer functions never raise diagnostics. Dereferencing a known-null
//! receiver continues with the access unchanged; rule checks observe the
//! fact through the emitted instruction events.

use crate::errors::{EngineError, Result};
use crate::features::symbolic_execution::domain::{
    Constraint, ConstraintDomain, ProgramState, SymbolicValue, ValueFactory,
};
use crate::features::symbolic_execution::ports::SymbolResolver;
use crate::shared::models::{BooleanOp, Instruction, LiteralValue, SymbolId};

/// Per-exploration context threaded through the transfer layer.
pub struct TransferContext<'a> {
    pub symbols: &'a dyn SymbolResolver,
    pub values: &'a mut ValueFactory,
}

pub fn apply(
    state: &ProgramState,
    instruction: Instruction,
    ctx: &mut TransferContext<'_>,
) -> Result<Vec<ProgramState>> {
    match instruction {
        Instruction::Literal(literal) => Ok(vec![literal_value(state, literal, ctx)]),
        Instruction::IdentifierRead(symbol) => identifier_read(state, symbol, ctx),
        Instruction::Assignment(symbol) => {
            let (value, state) = pop(state, "assignment")?;
            Ok(vec![state.bind(symbol, value).push(value)])
        }
        Instruction::LogicalNot => {
            let (value, state) = pop(state, "logical not")?;
            Ok(vec![
                match state.constraint_of(value, ConstraintDomain::Boolean) {
                    Some(Constraint::Bool(b)) => state.push(SymbolicValue::from_bool(!b)),
                    _ => push_fresh(&state, ctx, None),
                },
            ])
        }
        Instruction::BooleanBinary(op) if op.is_short_circuit() => short_circuit(state, op),
        Instruction::BooleanBinary(op) => eager_boolean(state, op, ctx),
        Instruction::Equality { negated } => equality(state, negated, ctx),
        Instruction::NullCoalesce { assign } => null_coalesce(state, assign),
        Instruction::IsPattern => is_pattern(state),
        Instruction::Upcast => {
            let (value, state) = pop(state, "upcast")?;
            let state = constrain_or_keep(state, value, Constraint::NOT_NULL);
            Ok(vec![state.push(value)])
        }
        Instruction::MemberAccess => {
            let (instance, state) = pop(state, "member access")?;
            let state = constrain_or_keep(state, instance, Constraint::NOT_NULL);
            Ok(vec![push_fresh(&state, ctx, None)])
        }
        Instruction::Invocation {
            callee,
            args,
            receiver,
        } => invocation(state, callee, args, receiver, ctx),
        Instruction::CatchEntry(symbol) => {
            // exceptions are never caught as null
            let value = ctx.values.fresh();
            let state = state.bind(symbol, value);
            let state = constrain_or_keep(state, value, Constraint::NOT_NULL);
            Ok(vec![state])
        }
        Instruction::Discard => {
            let (_, state) = pop(state, "discard")?;
            Ok(vec![state])
        }
        // flow termination is the driver's business; the state is unchanged
        Instruction::Jump(_) => Ok(vec![state.clone()]),
        Instruction::Opaque { pops } => {
            let mut state = state.clone();
            for _ in 0..pops {
                let (_, next) = pop(&state, "opaque")?;
                state = next;
            }
            Ok(vec![push_fresh(&state, ctx, None)])
        }
    }
}

fn literal_value(
    state: &ProgramState,
    literal: LiteralValue,
    ctx: &mut TransferContext<'_>,
) -> ProgramState {
    match literal {
        LiteralValue::True => state.push(SymbolicValue::True),
        LiteralValue::False => state.push(SymbolicValue::False),
        LiteralValue::Null => state.push(SymbolicValue::Null),
        LiteralValue::Constant => push_fresh(state, ctx, Some(Constraint::NOT_NULL)),
    }
}

/// First read of a symbol fixes its value for the rest of the path.
fn identifier_read(
    state: &ProgramState,
    symbol: SymbolId,
    ctx: &mut TransferContext<'_>,
) -> Result<Vec<ProgramState>> {
    if let Some(value) = state.value_of(symbol) {
        return Ok(vec![state.push(value)]);
    }
    let value = SymbolicValue::FromSymbol(symbol);
    let state = state.bind(symbol, value);
    let state = if ctx.symbols.is_value_type(symbol) {
        constrain_or_keep(state, value, Constraint::NOT_NULL)
    } else {
        state
    };
    Ok(vec![state.push(value)])
}

/// `&&` / `||` with flattened operands: the short-circuited successor
/// discards the right-hand value, the evaluated successor adopts it.
fn short_circuit(state: &ProgramState, op: BooleanOp) -> Result<Vec<ProgramState>> {
    let (rhs, state) = pop(state, "short-circuit binary")?;
    let (lhs, state) = pop(&state, "short-circuit binary")?;
    let deciding = matches!(op, BooleanOp::OrElse);
    let mut successors = Vec::with_capacity(2);
    if let Some(short) = state.constrain(lhs, Constraint::Bool(deciding)) {
        successors.push(short.push(SymbolicValue::from_bool(deciding)));
    }
    if let Some(evaluated) = state.constrain(lhs, Constraint::Bool(!deciding)) {
        successors.push(evaluated.push(rhs));
    }
    Ok(successors)
}

fn eager_boolean(
    state: &ProgramState,
    op: BooleanOp,
    ctx: &mut TransferContext<'_>,
) -> Result<Vec<ProgramState>> {
    let (rhs, state) = pop(state, "boolean binary")?;
    let (lhs, state) = pop(&state, "boolean binary")?;
    let result = match (
        state.constraint_of(lhs, ConstraintDomain::Boolean),
        state.constraint_of(rhs, ConstraintDomain::Boolean),
    ) {
        (Some(Constraint::Bool(a)), Some(Constraint::Bool(b))) => {
            state.push(SymbolicValue::from_bool(op.apply(a, b)))
        }
        _ => push_fresh(&state, ctx, None),
    };
    Ok(vec![result])
}

/// `==` / `!=` propagates a value-pinning constraint across the comparison:
/// the equal-outcome arm asserts it on the other operand, the unequal-outcome
/// arm asserts its negation. Only constraints that pin a unique runtime value
/// qualify (`Bool(_)`, `Null`); `NotNull` names infinitely many values, so
/// two non-null operands compare to an unconstrained fresh result.
fn equality(
    state: &ProgramState,
    negated: bool,
    ctx: &mut TransferContext<'_>,
) -> Result<Vec<ProgramState>> {
    let (rhs, state) = pop(state, "equality")?;
    let (lhs, state) = pop(&state, "equality")?;

    let pinned = |value: SymbolicValue| {
        state
            .constraint_of(value, ConstraintDomain::Boolean)
            .or_else(|| {
                state
                    .constraint_of(value, ConstraintDomain::Nullability)
                    .filter(|c| *c == Constraint::NULL)
            })
    };
    let shared = pinned(lhs)
        .map(|c| (c, rhs))
        .or_else(|| pinned(rhs).map(|c| (c, lhs)));

    let Some((known, other)) = shared else {
        return Ok(vec![push_fresh(&state, ctx, None)]);
    };

    let equal = state.constrain(other, known);
    let unequal = match known.negated() {
        Some(opposite) => state.constrain(other, opposite),
        None => Some(state.clone()),
    };
    let (true_arm, false_arm) = if negated { (unequal, equal) } else { (equal, unequal) };

    let mut successors = Vec::with_capacity(2);
    if let Some(arm) = true_arm {
        successors.push(arm.push(SymbolicValue::True));
    }
    if let Some(arm) = false_arm {
        successors.push(arm.push(SymbolicValue::False));
    }
    Ok(successors)
}

fn null_coalesce(state: &ProgramState, assign: Option<SymbolId>) -> Result<Vec<ProgramState>> {
    let (rhs, state) = pop(state, "null coalesce")?;
    let (lhs, state) = pop(&state, "null coalesce")?;
    let mut successors = Vec::with_capacity(2);
    if let Some(not_null) = state.constrain(lhs, Constraint::NOT_NULL) {
        let arm = match assign {
            Some(symbol) => not_null.bind(symbol, lhs),
            None => not_null,
        };
        successors.push(arm.push(lhs));
    }
    if let Some(null) = state.constrain(lhs, Constraint::NULL) {
        let arm = match assign {
            Some(symbol) => null.bind(symbol, rhs),
            None => null,
        };
        successors.push(arm.push(rhs));
    }
    Ok(successors)
}

fn is_pattern(state: &ProgramState) -> Result<Vec<ProgramState>> {
    let (value, state) = pop(state, "is pattern")?;
    let mut successors = Vec::with_capacity(2);
    // matched arm: the tested value is a real instance
    if let Some(matched) = state.constrain(value, Constraint::NOT_NULL) {
        successors.push(matched.push(SymbolicValue::True));
    }
    successors.push(state.push(SymbolicValue::False));
    Ok(successors)
}

fn invocation(
    state: &ProgramState,
    callee: Option<SymbolId>,
    args: u32,
    receiver: bool,
    ctx: &mut TransferContext<'_>,
) -> Result<Vec<ProgramState>> {
    let mut state = state.clone();
    for _ in 0..args {
        let (_, next) = pop(&state, "invocation")?;
        state = next;
    }
    if receiver {
        let (instance, next) = pop(&state, "invocation receiver")?;
        state = constrain_or_keep(next, instance, Constraint::NOT_NULL);
    }
    let pure = callee
        .map(|symbol| ctx.symbols.is_known_pure(symbol))
        .unwrap_or(false);
    if !pure {
        // fields and statics may change behind an impure call; locals never.
        // Constraints on the dropped values go with them, otherwise a later
        // re-read of the symbol would resurrect pre-call knowledge.
        let escaped: Vec<SymbolId> = state
            .bound_symbols()
            .filter(|symbol| ctx.symbols.kind(*symbol).escapes())
            .collect();
        if !escaped.is_empty() {
            state = state.forget(escaped).cleaned();
        }
    }
    Ok(vec![push_fresh(&state, ctx, None)])
}

fn pop(state: &ProgramState, operation: &'static str) -> Result<(SymbolicValue, ProgramState)> {
    state
        .pop()
        .ok_or(EngineError::StackUnderflow(operation))
}

fn push_fresh(
    state: &ProgramState,
    ctx: &mut TransferContext<'_>,
    constraint: Option<Constraint>,
) -> ProgramState {
    let value = ctx.values.fresh();
    let state = state.push(value);
    match constraint {
        Some(c) => state.constrain(value, c).unwrap_or(state),
        None => state,
    }
}

/// Applies `constraint` when consistent, keeps the state unchanged when it
/// would contradict (member access on a known null, cast of a known null).
fn constrain_or_keep(
    state: ProgramState,
    value: SymbolicValue,
    constraint: Constraint,
) -> ProgramState {
    match state.constrain(value, constraint) {
        Some(next) => next,
        None => state,
    }
}
