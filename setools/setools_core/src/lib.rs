//! # Setools Core
//!
//! `setools_core` provides the policy model that the setools query engine
//! operates on. This includes error types, the MLS value types, port
//! labeling rules, roles, and an in-memory policy representation.
//!
//! ## Core Concepts
//!
//! 1. **Level**: A sensitivity and a set of categories. Levels form a
//!    partial order (dominance), so two levels can be incomparable.
//!
//! 2. **Range**: A closed interval of levels whose high end dominates its
//!    low end.
//!
//! 3. **Portcon**: A rule binding a protocol and a port range to a
//!    security context.
//!
//! 4. **Policy Representation**: A fully-resolved, validated policy the
//!    query engine reads rules from. [`InMemoryPolicy`] builds one from a
//!    TOML or JSON document.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all setools components
//! - **types**: Value types shared by the policy and the query engine
//! - **policy**: The `PolicyRep` trait, the MLS symbol table, and the
//!   in-memory policy with its document loader

pub mod error;
pub mod policy;
pub mod types;

// Re-export key types and traits for convenience
pub use error::{Error, PolicyError, QueryError, Result};
pub use policy::{InMemoryPolicy, MlsLattice, PolicyDocument, PolicyRep};
pub use types::{
    Category, Context, Dominance, Dominate, Interval, Level, Portcon, PortconRange, Protocol, Range,
    Role, Sensitivity,
};
