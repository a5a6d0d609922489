//! Policy representation.
//!
//! This module defines the interface the query engine reads policies
//! through, and an in-memory implementation built from declarative
//! documents.

mod document;
mod in_memory;
mod lattice;

pub use document::{MlsSection, PolicyDocument, PortValue, PortconEntry};
pub use in_memory::{InMemoryPolicy, InMemoryPolicyBuilder};
pub use lattice::{MlsLattice, DEFAULT_SENSITIVITY};

use crate::error::QueryError;
use crate::types::{Level, Portcon, Range, Role};

/// Trait for policy representations.
///
/// A policy representation is fully resolved and validated. Its rule
/// collections are ordered and never change while borrowed.
pub trait PolicyRep {
    /// The port labeling rules, in policy order.
    fn portcons(&self) -> &[Portcon];

    /// The roles, in policy order.
    fn roles(&self) -> &[Role];

    /// Resolve a level written in the policy's notation.
    ///
    /// # Arguments
    ///
    /// * `text` - A level such as `s0` or `s1:c0.c3,c5`.
    ///
    /// # Returns
    ///
    /// * `Ok(Level)` - The level.
    /// * `Err(QueryError::RangeSyntax)` - If the text is malformed or names
    ///   unknown symbols.
    fn lookup_level(&self, text: &str) -> Result<Level, QueryError>;

    /// Resolve a range written in the policy's notation.
    ///
    /// # Arguments
    ///
    /// * `text` - A range such as `s0 - s1:c0.c4`, or a single level.
    ///
    /// # Returns
    ///
    /// * `Ok(Range)` - The range.
    /// * `Err(QueryError::RangeSyntax)` - If the text is malformed, names
    ///   unknown symbols, or its high level does not dominate its low level.
    fn lookup_range(&self, text: &str) -> Result<Range, QueryError>;
}

impl<P: PolicyRep + ?Sized> PolicyRep for &P {
    fn portcons(&self) -> &[Portcon] {
        (**self).portcons()
    }

    fn roles(&self) -> &[Role] {
        (**self).roles()
    }

    fn lookup_level(&self, text: &str) -> Result<Level, QueryError> {
        (**self).lookup_level(text)
    }

    fn lookup_range(&self, text: &str) -> Result<Range, QueryError> {
        (**self).lookup_range(text)
    }
}
