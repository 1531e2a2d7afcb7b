//! Immutable program state: the engine's snapshot at a program point.
//!
//! A state is never mutated in place. Every operation returns a new state;
//! the maps inside are `Arc`-shared and cloned on first write, so the
//! exploded graph's many states share structure instead of history.
//!
//! Structural equality and hashing cover the value stack, the symbol
//! bindings and the constraint table: O(live state), never O(history).
//! Per-block visit counters ride along for loop bounding but are excluded
//! from `Eq`/`Hash`; the driver folds them into its own dedup key.

use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::constraint::{Constraint, ConstraintDomain, ConstraintSet};
use super::symbolic_value::SymbolicValue;
use crate::shared::models::{BlockId, SymbolId};

#[derive(Debug, Clone, Default)]
pub struct ProgramState {
    stack: Vec<SymbolicValue>,
    bindings: Arc<FxHashMap<SymbolId, SymbolicValue>>,
    constraints: Arc<FxHashMap<SymbolicValue, ConstraintSet>>,
    visits: Arc<FxHashMap<BlockId, u32>>,
}

impl ProgramState {
    /// The state born at the entry program point.
    pub fn empty() -> Self {
        Self::default()
    }

    // ── value stack ────────────────────────────────────────────────

    pub fn push(&self, value: SymbolicValue) -> Self {
        let mut state = self.clone();
        state.stack.push(value);
        state
    }

    /// `None` means the front end staged fewer operands than the
    /// instruction consumes, which is an engine bug, not an analysis fact. The
    /// transfer layer converts it into an `EngineError`.
    pub fn pop(&self) -> Option<(SymbolicValue, Self)> {
        let mut state = self.clone();
        let value = state.stack.pop()?;
        Some((value, state))
    }

    pub fn peek(&self) -> Option<SymbolicValue> {
        self.stack.last().copied()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // ── symbol bindings ────────────────────────────────────────────

    /// Rebinds `symbol`, discarding its previous value. Constraints on the
    /// previous value survive while anything else still references it.
    pub fn bind(&self, symbol: SymbolId, value: SymbolicValue) -> Self {
        let mut state = self.clone();
        Arc::make_mut(&mut state.bindings).insert(symbol, value);
        state
    }

    /// Absent means "never bound on this path", not "unknown nullability".
    pub fn value_of(&self, symbol: SymbolId) -> Option<SymbolicValue> {
        self.bindings.get(&symbol).copied()
    }

    pub fn bound_symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.bindings.keys().copied()
    }

    /// Drops the bindings of `symbols` (dead per liveness, or invalidated
    /// at a call boundary).
    pub fn forget<I>(&self, symbols: I) -> Self
    where
        I: IntoIterator<Item = SymbolId>,
    {
        let mut symbols = symbols.into_iter().peekable();
        if symbols.peek().is_none() {
            return self.clone();
        }
        let mut state = self.clone();
        let bindings = Arc::make_mut(&mut state.bindings);
        for symbol in symbols {
            bindings.remove(&symbol);
        }
        state
    }

    // ── constraints ────────────────────────────────────────────────

    /// The single chokepoint for branch pruning: `None` means `constraint`
    /// contradicts what this state already knows about `value`: the path
    /// is infeasible and must be dropped.
    pub fn constrain(&self, value: SymbolicValue, constraint: Constraint) -> Option<Self> {
        // singleton built-ins are authoritative and never stored
        if let Some(implicit) = value.implicit_constraint(constraint.domain()) {
            return if implicit == constraint {
                Some(self.clone())
            } else {
                None
            };
        }
        let current = self.constraints.get(&value).copied().unwrap_or_default();
        let next = current.with(constraint)?;
        // implied constraints (e.g. NotNull) must also agree with built-ins
        for c in next.iter() {
            if let Some(implicit) = value.implicit_constraint(c.domain()) {
                if implicit != c {
                    return None;
                }
            }
        }
        if next == current {
            return Some(self.clone());
        }
        let mut state = self.clone();
        Arc::make_mut(&mut state.constraints).insert(value, next);
        Some(state)
    }

    pub fn constraint_of(
        &self,
        value: SymbolicValue,
        domain: ConstraintDomain,
    ) -> Option<Constraint> {
        value.implicit_constraint(domain).or_else(|| {
            self.constraints
                .get(&value)
                .and_then(|set| set.get(domain))
        })
    }

    pub fn has_constraint(&self, value: SymbolicValue, constraint: Constraint) -> bool {
        self.constraint_of(value, constraint.domain()) == Some(constraint)
    }

    /// Drops constraint-table entries for values no longer reachable from
    /// the stack or the bindings. Run at block boundaries so that state
    /// equality is over *reachable* entries only.
    pub fn cleaned(&self) -> Self {
        if self.constraints.is_empty() {
            return self.clone();
        }
        let reachable: FxHashSet<SymbolicValue> = self
            .stack
            .iter()
            .copied()
            .chain(self.bindings.values().copied())
            .collect();
        if self.constraints.keys().all(|v| reachable.contains(v)) {
            return self.clone();
        }
        let mut state = self.clone();
        Arc::make_mut(&mut state.constraints).retain(|v, _| reachable.contains(v));
        state
    }

    // ── visit metadata ─────────────────────────────────────────────

    pub fn visit_count(&self, block: BlockId) -> u32 {
        self.visits.get(&block).copied().unwrap_or(0)
    }

    /// Increments the per-block counter, returning the new count.
    pub fn add_visit(&self, block: BlockId) -> (u32, Self) {
        let mut state = self.clone();
        let visits = Arc::make_mut(&mut state.visits);
        let count = visits.entry(block).or_insert(0);
        *count += 1;
        let count = *count;
        (count, state)
    }

    pub(crate) fn same_visits(&self, other: &Self) -> bool {
        self.visits == other.visits
    }

    pub(crate) fn hash_visits<H: Hasher>(&self, hasher: &mut H) {
        hasher.write_u64(unordered_hash(self.visits.iter()));
    }
}

impl PartialEq for ProgramState {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
            && self.bindings == other.bindings
            && self.constraints == other.constraints
    }
}

impl Eq for ProgramState {}

impl Hash for ProgramState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.stack.hash(hasher);
        hasher.write_u64(unordered_hash(self.bindings.iter()));
        hasher.write_u64(unordered_hash(self.constraints.iter()));
    }
}

/// Order-independent combination of per-entry hashes, so two maps with the
/// same entries hash alike regardless of insertion history.
fn unordered_hash<T: Hash>(entries: impl Iterator<Item = T>) -> u64 {
    entries
        .map(|entry| {
            let mut hasher = FxHasher::default();
            entry.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0, u64::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(state: &ProgramState) -> u64 {
        let mut hasher = FxHasher::default();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn push_pop_round_trip() {
        let state = ProgramState::empty().push(SymbolicValue::True);
        let (value, state) = state.pop().unwrap();
        assert_eq!(value, SymbolicValue::True);
        assert_eq!(state.stack_depth(), 0);
        assert!(state.pop().is_none());
    }

    #[test]
    fn bind_rebinds() {
        let a = SymbolId(0);
        let state = ProgramState::empty().bind(a, SymbolicValue::Null);
        assert_eq!(state.value_of(a), Some(SymbolicValue::Null));
        let state = state.bind(a, SymbolicValue::True);
        assert_eq!(state.value_of(a), Some(SymbolicValue::True));
        assert_eq!(state.value_of(SymbolId(7)), None);
    }

    #[test]
    fn constrain_contradiction_is_infeasible() {
        let v = SymbolicValue::Fresh(0);
        let state = ProgramState::empty()
            .push(v)
            .constrain(v, Constraint::Bool(true))
            .unwrap();
        assert!(state.constrain(v, Constraint::Bool(false)).is_none());
        assert!(state.has_constraint(v, Constraint::Bool(true)));
        // implied by the boolean constraint
        assert!(state.has_constraint(v, Constraint::NOT_NULL));
    }

    #[test]
    fn singleton_constraints_are_implicit() {
        let state = ProgramState::empty();
        let constrained = state.constrain(SymbolicValue::Null, Constraint::NULL).unwrap();
        // nothing was stored, so the states stay structurally equal
        assert_eq!(state, constrained);
        assert!(state.constrain(SymbolicValue::Null, Constraint::NOT_NULL).is_none());
        assert!(state.constrain(SymbolicValue::True, Constraint::Bool(false)).is_none());
        // Disposal implies NotNull, which the null singleton refutes
        assert!(state.constrain(SymbolicValue::Null, Constraint::Disposed).is_none());
    }

    #[test]
    fn forget_drops_bindings() {
        let a = SymbolId(0);
        let b = SymbolId(1);
        let state = ProgramState::empty()
            .bind(a, SymbolicValue::True)
            .bind(b, SymbolicValue::False);
        let state = state.forget([a]);
        assert_eq!(state.value_of(a), None);
        assert_eq!(state.value_of(b), Some(SymbolicValue::False));
    }

    #[test]
    fn cleaned_drops_unreachable_constraints() {
        let a = SymbolId(0);
        let dead = SymbolicValue::Fresh(0);
        let live = SymbolicValue::Fresh(1);
        let state = ProgramState::empty()
            .bind(a, live)
            .constrain(live, Constraint::NOT_NULL)
            .unwrap()
            .constrain(dead, Constraint::Bool(true))
            .unwrap()
            .cleaned();
        assert!(state.has_constraint(live, Constraint::NOT_NULL));
        assert_eq!(state.constraint_of(dead, ConstraintDomain::Boolean), None);
    }

    #[test]
    fn equality_ignores_visit_counters() {
        let (_, visited) = ProgramState::empty().add_visit(BlockId(0));
        assert_eq!(ProgramState::empty(), visited);
        assert_eq!(hash_of(&ProgramState::empty()), hash_of(&visited));
        assert!(!ProgramState::empty().same_visits(&visited));
    }

    #[test]
    fn hash_is_insertion_order_independent() {
        let a = SymbolId(0);
        let b = SymbolId(1);
        let first = ProgramState::empty()
            .bind(a, SymbolicValue::True)
            .bind(b, SymbolicValue::Null);
        let second = ProgramState::empty()
            .bind(b, SymbolicValue::Null)
            .bind(a, SymbolicValue::True);
        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
    }

    #[test]
    fn add_visit_counts_per_block() {
        let block = BlockId(2);
        let state = ProgramState::empty();
        let (count, state) = state.add_visit(block);
        assert_eq!(count, 1);
        let (count, state) = state.add_visit(block);
        assert_eq!(count, 2);
        assert_eq!(state.visit_count(block), 2);
        assert_eq!(state.visit_count(BlockId(0)), 0);
    }
}
