//! Interval relations and match modes.
//!
//! The relations are defined once over any [`Interval`] whose bounds
//! implement [`Dominate`], so port ranges and MLS ranges share the same
//! algebra. Only `dominates_or_equal` is ever consulted, so incomparable
//! levels make every relation false instead of being mistaken for equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use setools_core::types::{Dominate, Interval};

/// `a` and `b` have identical bounds.
pub fn equal<I: Interval>(a: &I, b: &I) -> bool {
    a.low() == b.low() && a.high() == b.high()
}

/// `a` is contained in `b`.
pub fn subset<I: Interval>(a: &I, b: &I) -> bool {
    a.low().dominates_or_equal(b.low()) && b.high().dominates_or_equal(a.high())
}

/// `a` contains `b`.
pub fn superset<I: Interval>(a: &I, b: &I) -> bool {
    subset(b, a)
}

/// `a` and `b` share at least one point.
pub fn overlap<I: Interval>(a: &I, b: &I) -> bool {
    a.high().dominates_or_equal(b.low()) && b.high().dominates_or_equal(a.low())
}

/// `a` is contained in `b` and the two differ.
pub fn proper_subset<I: Interval>(a: &I, b: &I) -> bool {
    subset(a, b) && !equal(a, b)
}

/// `a` contains `b` and the two differ.
pub fn proper_superset<I: Interval>(a: &I, b: &I) -> bool {
    superset(a, b) && !equal(a, b)
}

/// The relation used to compare a query interval against a rule's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMatch {
    /// Bounds must be identical.
    #[default]
    Exact,

    /// The intervals must share a point.
    Overlap,

    /// The query interval must be contained in the rule's.
    Subset,

    /// The query interval must contain the rule's.
    Superset,
}

impl fmt::Display for RangeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Overlap => write!(f, "overlap"),
            Self::Subset => write!(f, "subset"),
            Self::Superset => write!(f, "superset"),
        }
    }
}

/// A relation plus the proper flag.
///
/// `proper` excludes equality from [`RangeMatch::Subset`] and
/// [`RangeMatch::Superset`] and has no effect on the other relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MatchMode {
    /// The relation.
    pub relation: RangeMatch,

    /// Whether subset/superset must be strict.
    #[serde(default)]
    pub proper: bool,
}

impl MatchMode {
    /// Exact matching.
    pub const EXACT: Self = Self::new(RangeMatch::Exact, false);

    /// Create a match mode.
    pub const fn new(relation: RangeMatch, proper: bool) -> Self {
        Self { relation, proper }
    }

    /// Resolve the four independent option flags into a single mode.
    ///
    /// Precedence is subset, then superset, then overlap, then exact.
    /// Flags that lose are logged and ignored.
    pub fn from_flags(overlap: bool, subset: bool, superset: bool, proper: bool) -> Self {
        let relation = if subset {
            RangeMatch::Subset
        } else if superset {
            RangeMatch::Superset
        } else if overlap {
            RangeMatch::Overlap
        } else {
            RangeMatch::Exact
        };

        if [overlap, subset, superset].iter().filter(|&&set| set).count() > 1 {
            warn!(
                "Multiple match flags set (overlap={}, subset={}, superset={}); using {}",
                overlap, subset, superset, relation
            );
        }

        Self::new(relation, proper)
    }

    /// Evaluate `relation(query, rule)`.
    pub fn matches<I: Interval>(&self, query: &I, rule: &I) -> bool {
        match (self.relation, self.proper) {
            (RangeMatch::Exact, _) => equal(query, rule),
            (RangeMatch::Overlap, _) => overlap(query, rule),
            (RangeMatch::Subset, false) => subset(query, rule),
            (RangeMatch::Subset, true) => proper_subset(query, rule),
            (RangeMatch::Superset, false) => superset(query, rule),
            (RangeMatch::Superset, true) => proper_superset(query, rule),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            RangeMatch::Subset | RangeMatch::Superset if self.proper => {
                write!(f, "proper {}", self.relation)
            }
            _ => write!(f, "{}", self.relation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setools_core::types::{Category, Level, PortconRange, Range, Sensitivity};

    fn ports(low: u16, high: u16) -> PortconRange {
        PortconRange::new(low, high).unwrap()
    }

    fn level(rank: u32, cats: &[u32]) -> Level {
        Level::new(
            Sensitivity::new(rank, format!("s{}", rank)),
            cats.iter().map(|&id| Category::new(id, format!("c{}", id))),
        )
    }

    #[test]
    fn test_port_relations() {
        let rule = ports(50300, 50310);
        let query = ports(50301, 50309);

        assert!(subset(&query, &rule));
        assert!(proper_subset(&query, &rule));
        assert!(superset(&rule, &query));
        assert!(!superset(&query, &rule));
        assert!(overlap(&query, &rule));
        assert!(!equal(&query, &rule));

        assert!(subset(&rule, &rule));
        assert!(!proper_subset(&rule, &rule));
    }

    #[test]
    fn test_port_overlap_edges() {
        let rule = ports(60101, 60110);

        assert!(overlap(&ports(60100, 60105), &rule));
        assert!(overlap(&ports(60110, 60120), &rule));
        assert!(!overlap(&ports(60111, 60120), &rule));
        assert!(!overlap(&ports(60000, 60100), &rule));
    }

    #[test]
    fn test_level_relations() {
        // s0:c1 - s0:c0.c4
        let rule = Range::new(level(0, &[1]), level(0, &[0, 1, 2, 3, 4]));
        // s0:c1,c2 - s0:c0.c3
        let query = Range::new(level(0, &[1, 2]), level(0, &[0, 1, 2, 3]));

        assert!(subset(&query, &rule));
        assert!(proper_subset(&query, &rule));
        assert!(overlap(&query, &rule));
        assert!(!superset(&query, &rule));
    }

    #[test]
    fn test_incomparable_levels_never_relate() {
        let a = Range::single(level(0, &[1]));
        let b = Range::single(level(0, &[2]));

        assert!(!equal(&a, &b));
        assert!(!subset(&a, &b));
        assert!(!superset(&a, &b));
        assert!(!overlap(&a, &b));
    }

    #[test]
    fn test_from_flags_precedence() {
        assert_eq!(
            MatchMode::from_flags(false, false, false, false),
            MatchMode::EXACT
        );
        assert_eq!(
            MatchMode::from_flags(true, false, false, true).relation,
            RangeMatch::Overlap
        );
        assert_eq!(
            MatchMode::from_flags(true, true, true, false).relation,
            RangeMatch::Subset
        );
        assert_eq!(
            MatchMode::from_flags(true, false, true, false).relation,
            RangeMatch::Superset
        );
    }

    #[test]
    fn test_proper_ignored_for_overlap_and_exact() {
        let rule = ports(80, 90);

        assert!(MatchMode::new(RangeMatch::Overlap, true).matches(&rule, &rule));
        assert!(MatchMode::new(RangeMatch::Exact, true).matches(&rule, &rule));
        assert!(!MatchMode::new(RangeMatch::Subset, true).matches(&rule, &rule));
        assert!(!MatchMode::new(RangeMatch::Superset, true).matches(&rule, &rule));
    }

    #[test]
    fn test_superset_direction() {
        let rule = ports(50801, 50801);
        let mode = MatchMode::new(RangeMatch::Superset, true);

        assert!(!mode.matches(&ports(50801, 50801), &rule));
        assert!(mode.matches(&ports(50800, 50801), &rule));
        assert!(mode.matches(&ports(50801, 50802), &rule));
    }

    #[test]
    fn test_match_mode_display() {
        assert_eq!(MatchMode::EXACT.to_string(), "exact");
        assert_eq!(
            MatchMode::new(RangeMatch::Subset, true).to_string(),
            "proper subset"
        );
        assert_eq!(
            MatchMode::new(RangeMatch::Overlap, true).to_string(),
            "overlap"
        );
    }
}
