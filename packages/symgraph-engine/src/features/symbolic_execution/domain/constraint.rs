//! Constraint domains over symbolic values.
//!
//! Each domain is a small set of mutually exclusive values; any two distinct
//! constraints from the same domain on the same value contradict. Domains
//! are independent: a value may hold `NotNull` and `Disposed` at once.
//!
//! Adding a domain means adding a `ConstraintDomain` variant, its
//! `Constraint` representation, and growing `ConstraintSet::SLOTS`; the
//! exploration driver never changes.

/// Identity of a constraint domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintDomain {
    Boolean,
    Nullability,
    Disposal,
}

impl ConstraintDomain {
    fn slot(self) -> usize {
        match self {
            ConstraintDomain::Boolean => 0,
            ConstraintDomain::Nullability => 1,
            ConstraintDomain::Disposal => 2,
        }
    }
}

/// Nullability of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullness {
    Null,
    NotNull,
}

/// One assertion about a symbolic value, tagged by domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    Bool(bool),
    Nullability(Nullness),
    Disposed,
}

impl Constraint {
    pub const NULL: Constraint = Constraint::Nullability(Nullness::Null);
    pub const NOT_NULL: Constraint = Constraint::Nullability(Nullness::NotNull);

    pub fn domain(self) -> ConstraintDomain {
        match self {
            Constraint::Bool(_) => ConstraintDomain::Boolean,
            Constraint::Nullability(_) => ConstraintDomain::Nullability,
            Constraint::Disposed => ConstraintDomain::Disposal,
        }
    }

    /// Same domain, different value.
    pub fn contradicts(self, other: Constraint) -> bool {
        self.domain() == other.domain() && self != other
    }

    /// The opposite constraint within a two-valued domain, if one exists.
    pub fn negated(self) -> Option<Constraint> {
        match self {
            Constraint::Bool(b) => Some(Constraint::Bool(!b)),
            Constraint::Nullability(Nullness::Null) => Some(Constraint::NOT_NULL),
            Constraint::Nullability(Nullness::NotNull) => Some(Constraint::NULL),
            Constraint::Disposed => None,
        }
    }

    /// Holding a Boolean or Disposal constraint presumes the value is a
    /// usable reference (or a real boolean), which implies `NotNull`.
    fn implies_not_null(self) -> bool {
        matches!(self, Constraint::Bool(_) | Constraint::Disposed)
    }
}

/// At most one constraint per domain on a single symbolic value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConstraintSet {
    slots: [Option<Constraint>; Self::SLOTS],
}

impl ConstraintSet {
    pub const SLOTS: usize = 3;

    pub fn get(&self, domain: ConstraintDomain) -> Option<Constraint> {
        self.slots[domain.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Adds `constraint`, returning `None` on contradiction. Asserting an
    /// already-present constraint is a feasible no-op. Boolean and Disposal
    /// constraints also record the implied `NotNull`.
    pub fn with(mut self, constraint: Constraint) -> Option<ConstraintSet> {
        match self.get(constraint.domain()) {
            Some(existing) if existing != constraint => return None,
            Some(_) => {}
            None => self.slots[constraint.domain().slot()] = Some(constraint),
        }
        if constraint.implies_not_null() {
            match self.get(ConstraintDomain::Nullability) {
                Some(Constraint::NULL) => return None,
                Some(_) => {}
                None => {
                    self.slots[ConstraintDomain::Nullability.slot()] = Some(Constraint::NOT_NULL)
                }
            }
        }
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_domain_distinct_values_contradict() {
        assert!(Constraint::Bool(true).contradicts(Constraint::Bool(false)));
        assert!(Constraint::NULL.contradicts(Constraint::NOT_NULL));
        assert!(!Constraint::Bool(true).contradicts(Constraint::Bool(true)));
    }

    #[test]
    fn domains_are_independent() {
        assert!(!Constraint::NOT_NULL.contradicts(Constraint::Disposed));
        let set = ConstraintSet::default()
            .with(Constraint::NOT_NULL)
            .and_then(|s| s.with(Constraint::Disposed))
            .unwrap();
        assert_eq!(set.get(ConstraintDomain::Nullability), Some(Constraint::NOT_NULL));
        assert_eq!(set.get(ConstraintDomain::Disposal), Some(Constraint::Disposed));
    }

    #[test]
    fn contradiction_yields_none() {
        let set = ConstraintSet::default().with(Constraint::Bool(true)).unwrap();
        assert_eq!(set.with(Constraint::Bool(false)), None);
    }

    #[test]
    fn reasserting_is_a_noop() {
        let set = ConstraintSet::default().with(Constraint::NULL).unwrap();
        assert_eq!(set.with(Constraint::NULL), Some(set));
    }

    #[test]
    fn boolean_implies_not_null() {
        let set = ConstraintSet::default().with(Constraint::Bool(false)).unwrap();
        assert_eq!(set.get(ConstraintDomain::Nullability), Some(Constraint::NOT_NULL));

        // and therefore contradicts a prior Null
        let null_set = ConstraintSet::default().with(Constraint::NULL).unwrap();
        assert_eq!(null_set.with(Constraint::Bool(true)), None);
        assert_eq!(null_set.with(Constraint::Disposed), None);
    }

    #[test]
    fn negation_in_two_valued_domains() {
        assert_eq!(Constraint::Bool(true).negated(), Some(Constraint::Bool(false)));
        assert_eq!(Constraint::NULL.negated(), Some(Constraint::NOT_NULL));
        assert_eq!(Constraint::Disposed.negated(), None);
    }
}
