//! Dominance and intervals.
//!
//! Port numbers and MLS levels are both compared through [`Dominate`], which
//! reports one of four outcomes. Integers never report
//! [`Dominance::Incomparable`]; levels do when their category sets are not
//! nested the same way as their sensitivities.

use std::cmp::Ordering;

/// Outcome of comparing two elements of a partially ordered domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// Both elements are equal.
    Equal,

    /// The left element strictly dominates the right.
    Dominates,

    /// The right element strictly dominates the left.
    DominatedBy,

    /// Neither element dominates the other.
    Incomparable,
}

impl Dominance {
    /// `true` for `Equal` and `Dominates`.
    pub fn dominates_or_equal(self) -> bool {
        matches!(self, Self::Equal | Self::Dominates)
    }

    /// The same comparison seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            Self::Dominates => Self::DominatedBy,
            Self::DominatedBy => Self::Dominates,
            other => other,
        }
    }
}

impl From<Ordering> for Dominance {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::DominatedBy,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Dominates,
        }
    }
}

/// A partially ordered domain.
pub trait Dominate {
    /// Compare `self` against `other`.
    fn dominance(&self, other: &Self) -> Dominance;

    /// Whether `self` is at least as dominant as `other`.
    fn dominates_or_equal(&self, other: &Self) -> bool {
        self.dominance(other).dominates_or_equal()
    }
}

impl Dominate for u16 {
    fn dominance(&self, other: &Self) -> Dominance {
        self.cmp(other).into()
    }
}

/// A closed interval whose high bound dominates or equals its low bound.
pub trait Interval {
    /// The domain of the bounds.
    type Bound: Dominate + PartialEq;

    /// The low bound.
    fn low(&self) -> &Self::Bound;

    /// The high bound.
    fn high(&self) -> &Self::Bound;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortconRange;

    #[test]
    fn test_integer_dominance() {
        assert_eq!(5u16.dominance(&5), Dominance::Equal);
        assert_eq!(6u16.dominance(&5), Dominance::Dominates);
        assert_eq!(4u16.dominance(&5), Dominance::DominatedBy);
        assert!(6u16.dominates_or_equal(&5));
        assert!(!4u16.dominates_or_equal(&5));
    }

    #[test]
    fn test_dominance_reverse() {
        assert_eq!(Dominance::Dominates.reverse(), Dominance::DominatedBy);
        assert_eq!(Dominance::Equal.reverse(), Dominance::Equal);
        assert_eq!(Dominance::Incomparable.reverse(), Dominance::Incomparable);
    }

    #[test]
    fn test_port_interval_bounds() {
        let range = PortconRange::new(50300, 50310).unwrap();
        assert_eq!(*Interval::low(&range), 50300);
        assert_eq!(*Interval::high(&range), 50310);
    }
}
