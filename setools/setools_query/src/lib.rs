//! # Setools Query
//!
//! `setools_query` searches a policy representation for rules that satisfy
//! a set of criteria.
//!
//! Key concepts:
//!
//! 1. **Label Criterion**: An identifier to match, either exactly or as a
//!    regular expression covering the whole identifier.
//!
//! 2. **Interval Relation**: Equal, subset, superset, overlap, and their
//!    proper variants, defined once over port ranges and MLS ranges alike.
//!
//! 3. **Match Mode**: The relation a query range must have with a rule's
//!    range, plus whether subset/superset must be strict.
//!
//! 4. **Query**: A set of optional criteria evaluated lazily against the
//!    policy's rules, yielding matches in policy order.

pub mod compare;
pub mod matcher;
pub mod options;
pub mod portcon;
pub mod role;

// Re-export key types for convenience
pub use compare::{MatchMode, RangeMatch};
pub use matcher::{match_label, LabelCriterion};
pub use options::{PortconQueryOptions, RoleQueryOptions};
pub use portcon::PortconQuery;
pub use role::{RoleQuery, TypesCriterion};
