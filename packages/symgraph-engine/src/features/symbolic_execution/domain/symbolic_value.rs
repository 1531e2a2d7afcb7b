//! Symbolic values: opaque identities for expression results.
//!
//! Three kinds, per the state model:
//! - singletons `True` / `False` / `Null`: canonical, structurally equal
//!   across paths, with built-in (implicit) constraints;
//! - `Fresh(n)`: unique per introduction, numbered by [`ValueFactory`];
//! - `FromSymbol(s)`: the canonical value of a symbol's first read, so two
//!   paths that read the same unassigned symbol agree on its identity.

use std::fmt;

use super::constraint::{Constraint, ConstraintDomain};
use crate::shared::models::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolicValue {
    True,
    False,
    Null,
    Fresh(u32),
    FromSymbol(SymbolId),
}

impl SymbolicValue {
    pub fn from_bool(value: bool) -> Self {
        if value {
            SymbolicValue::True
        } else {
            SymbolicValue::False
        }
    }

    /// Built-in constraint of a singleton in `domain`, if any. These are
    /// consulted by `ProgramState::constrain` but never stored, so they do
    /// not perturb structural state equality.
    pub fn implicit_constraint(self, domain: ConstraintDomain) -> Option<Constraint> {
        match (self, domain) {
            (SymbolicValue::True, ConstraintDomain::Boolean) => Some(Constraint::Bool(true)),
            (SymbolicValue::False, ConstraintDomain::Boolean) => Some(Constraint::Bool(false)),
            (SymbolicValue::True | SymbolicValue::False, ConstraintDomain::Nullability) => {
                Some(Constraint::NOT_NULL)
            }
            (SymbolicValue::Null, ConstraintDomain::Nullability) => Some(Constraint::NULL),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicValue::True => write!(f, "true"),
            SymbolicValue::False => write!(f, "false"),
            SymbolicValue::Null => write!(f, "null"),
            SymbolicValue::Fresh(n) => write!(f, "v{n}"),
            SymbolicValue::FromSymbol(s) => write!(f, "val({s})"),
        }
    }
}

/// Hands out fresh value identities for one exploration. Owned by the
/// driver; never shared across function bodies.
#[derive(Debug, Default)]
pub struct ValueFactory {
    next: u32,
}

impl ValueFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> SymbolicValue {
        let v = SymbolicValue::Fresh(self.next);
        self.next += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_structural() {
        assert_eq!(SymbolicValue::from_bool(true), SymbolicValue::True);
        assert_eq!(SymbolicValue::Null, SymbolicValue::Null);
        assert_ne!(SymbolicValue::True, SymbolicValue::False);
    }

    #[test]
    fn fresh_values_are_unique() {
        let mut factory = ValueFactory::new();
        assert_ne!(factory.fresh(), factory.fresh());
    }

    #[test]
    fn implicit_constraints() {
        assert_eq!(
            SymbolicValue::True.implicit_constraint(ConstraintDomain::Boolean),
            Some(Constraint::Bool(true))
        );
        assert_eq!(
            SymbolicValue::Null.implicit_constraint(ConstraintDomain::Nullability),
            Some(Constraint::NULL)
        );
        assert_eq!(
            SymbolicValue::False.implicit_constraint(ConstraintDomain::Nullability),
            Some(Constraint::NOT_NULL)
        );
        assert_eq!(
            SymbolicValue::Fresh(0).implicit_constraint(ConstraintDomain::Boolean),
            None
        );
        assert_eq!(
            SymbolicValue::Null.implicit_constraint(ConstraintDomain::Disposal),
            None
        );
    }
}
