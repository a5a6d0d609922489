//! MLS value types.
//!
//! A [`Level`] is a sensitivity plus a set of categories. Levels are only
//! partially ordered: two levels at the same sensitivity with disjoint
//! category sets dominate neither each other, so comparisons return a
//! [`Dominance`] rather than a `std::cmp::Ordering`.
//!
//! [`Dominance`]: super::interval::Dominance

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::interval::{Dominance, Dominate, Interval};

/// A sensitivity, identified by its rank in the policy's dominance order.
///
/// Equality and ordering use the rank only. The name is carried for display.
#[derive(Debug, Clone)]
pub struct Sensitivity {
    rank: u32,
    name: String,
}

impl Sensitivity {
    /// Create a sensitivity with the given rank (0 is the lowest).
    pub fn new(rank: u32, name: impl Into<String>) -> Self {
        Self {
            rank,
            name: name.into(),
        }
    }

    /// The rank of this sensitivity in the dominance order.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// The declared name of this sensitivity.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Sensitivity {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Sensitivity {}

impl Hash for Sensitivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
    }
}

impl PartialOrd for Sensitivity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensitivity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A category, identified by its position in the policy's category list.
#[derive(Debug, Clone)]
pub struct Category {
    id: u32,
    name: String,
}

impl Category {
    /// Create a category with the given id.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The id of this category.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The declared name of this category.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An MLS level: a sensitivity and a set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Level {
    sensitivity: Sensitivity,
    categories: BTreeSet<Category>,
}

impl Level {
    /// Create a level.
    pub fn new(sensitivity: Sensitivity, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            sensitivity,
            categories: categories.into_iter().collect(),
        }
    }

    /// The sensitivity of this level.
    pub fn sensitivity(&self) -> &Sensitivity {
        &self.sensitivity
    }

    /// The categories of this level, in category order.
    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }
}

impl Dominate for Level {
    /// `self` dominates `other` when its sensitivity is at least as high and
    /// its categories are a superset of `other`'s. When the sensitivity order
    /// and the category containment point in different directions, or the
    /// category sets are not nested, the levels are incomparable.
    fn dominance(&self, other: &Self) -> Dominance {
        let sens = self.sensitivity.cmp(&other.sensitivity);
        let superset = self.categories.is_superset(&other.categories);
        let subset = self.categories.is_subset(&other.categories);

        match sens {
            Ordering::Equal if superset && subset => Dominance::Equal,
            Ordering::Equal | Ordering::Greater if superset => Dominance::Dominates,
            Ordering::Equal | Ordering::Less if subset => Dominance::DominatedBy,
            _ => Dominance::Incomparable,
        }
    }
}

impl fmt::Display for Level {
    /// Renders `sens[:cats]`, collapsing runs of consecutive category ids as
    /// `first.last` and separating runs with commas.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sensitivity)?;

        let cats: Vec<&Category> = self.categories.iter().collect();
        let mut i = 0;
        while i < cats.len() {
            f.write_str(if i == 0 { ":" } else { "," })?;

            let mut j = i;
            while j + 1 < cats.len() && cats[j + 1].id() == cats[j].id() + 1 {
                j += 1;
            }

            match j - i {
                0 => write!(f, "{}", cats[i])?,
                1 => write!(f, "{},{}", cats[i], cats[j])?,
                _ => write!(f, "{}.{}", cats[i], cats[j])?,
            }
            i = j + 1;
        }

        Ok(())
    }
}

/// A closed MLS range. The high level dominates or equals the low level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    low: Level,
    high: Level,
}

impl Range {
    /// Create a range from already-validated levels.
    ///
    /// Callers building ranges from untrusted input should go through
    /// [`crate::policy::PolicyRep::lookup_range`], which checks that `high`
    /// dominates `low`.
    pub fn new(low: Level, high: Level) -> Self {
        Self { low, high }
    }

    /// A range containing exactly one level.
    pub fn single(level: Level) -> Self {
        Self {
            low: level.clone(),
            high: level,
        }
    }
}

impl Interval for Range {
    type Bound = Level;

    /// The low level.
    fn low(&self) -> &Level {
        &self.low
    }

    /// The high level.
    fn high(&self) -> &Level {
        &self.high
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{} - {}", self.low, self.high)
        }
    }
}
