//! Property-based tests for the program-state constraint model.
//!
//! Invariants that must hold for ALL constraint sequences:
//! - No reachable state ever carries contradictory constraints
//! - `Bool` and `Disposed` always imply `NotNull`
//! - `constrain` is idempotent
//! - Compatible constraints commute across distinct values

use proptest::prelude::*;
use symgraph_engine::{Constraint, ProgramState, SymbolicValue};

fn any_constraint() -> impl Strategy<Value = Constraint> {
    prop_oneof![
        any::<bool>().prop_map(Constraint::Bool),
        Just(Constraint::NULL),
        Just(Constraint::NOT_NULL),
        Just(Constraint::Disposed),
    ]
}

fn any_value() -> impl Strategy<Value = SymbolicValue> {
    (0u32..4).prop_map(SymbolicValue::Fresh)
}

/// Applies a sequence of constraints, skipping the infeasible ones, the way
/// the engine prunes infeasible successors.
fn apply_all(steps: &[(SymbolicValue, Constraint)]) -> ProgramState {
    let mut state = ProgramState::empty();
    // keep every value reachable so no constraint is garbage collected
    for id in 0..4 {
        state = state.push(SymbolicValue::Fresh(id));
    }
    for &(value, constraint) in steps {
        if let Some(next) = state.constrain(value, constraint) {
            state = next;
        }
    }
    state
}

proptest! {
    #[test]
    fn surviving_states_are_never_contradictory(
        steps in proptest::collection::vec((any_value(), any_constraint()), 0..32)
    ) {
        let state = apply_all(&steps);
        for id in 0..4 {
            let value = SymbolicValue::Fresh(id);
            prop_assert!(
                !(state.has_constraint(value, Constraint::Bool(true))
                    && state.has_constraint(value, Constraint::Bool(false)))
            );
            prop_assert!(
                !(state.has_constraint(value, Constraint::NULL)
                    && state.has_constraint(value, Constraint::NOT_NULL))
            );
        }
    }

    #[test]
    fn bool_and_disposed_imply_not_null(
        steps in proptest::collection::vec((any_value(), any_constraint()), 0..32)
    ) {
        let state = apply_all(&steps);
        for id in 0..4 {
            let value = SymbolicValue::Fresh(id);
            let implies = state.has_constraint(value, Constraint::Bool(true))
                || state.has_constraint(value, Constraint::Bool(false))
                || state.has_constraint(value, Constraint::Disposed);
            if implies {
                prop_assert!(state.has_constraint(value, Constraint::NOT_NULL));
            }
        }
    }

    #[test]
    fn constrain_is_idempotent(
        value in any_value(),
        constraint in any_constraint(),
    ) {
        let state = ProgramState::empty().push(value);
        if let Some(once) = state.constrain(value, constraint) {
            let twice = once.constrain(value, constraint);
            prop_assert_eq!(twice, Some(once));
        }
    }

    #[test]
    fn compatible_constraints_commute_across_values(
        a_constraint in any_constraint(),
        b_constraint in any_constraint(),
    ) {
        let a = SymbolicValue::Fresh(0);
        let b = SymbolicValue::Fresh(1);
        let state = ProgramState::empty().push(a).push(b);

        let ab = state
            .constrain(a, a_constraint)
            .and_then(|s| s.constrain(b, b_constraint));
        let ba = state
            .constrain(b, b_constraint)
            .and_then(|s| s.constrain(a, a_constraint));
        prop_assert_eq!(ab, ba);
    }
}
