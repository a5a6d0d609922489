//! Error types for the setools crates.
//!
//! Errors are organized by subsystem. `QueryError` covers misuse of the
//! query surface (bad patterns, malformed ranges, unknown arguments) and
//! `PolicyError` covers problems building a policy representation.
//!
//! The root error type, `Error`, can wrap any of the subsystem-specific
//! errors, allowing for uniform error handling at the top level.

use thiserror::Error;

/// Root error type for setools.
#[derive(Debug, Error)]
pub enum Error {
    /// Query construction or evaluation errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Policy representation errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by query criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A regular expression criterion could not be compiled
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,

        /// Why compilation failed
        reason: String,
    },

    /// MLS level or range text is malformed, names unknown components,
    /// or has a high level that does not dominate the low level
    #[error("Invalid range syntax: {0}")]
    RangeSyntax(String),

    /// A numeric range has its bounds reversed
    #[error("Invalid range: low {low} is greater than high {high}")]
    InvalidRange {
        /// Low bound as given
        low: u32,

        /// High bound as given
        high: u32,
    },

    /// An argument value is not recognized
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised while building a policy representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A rule in the policy document failed validation
    #[error("Invalid rule at index {index}: {reason}")]
    InvalidRule {
        /// Position of the rule in the document
        index: usize,

        /// What was wrong with it
        reason: String,
    },

    /// A name was declared more than once
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName {
        /// What kind of symbol was duplicated
        kind: &'static str,

        /// The duplicated name
        name: String,
    },

    /// The document itself is unusable
    #[error("Invalid policy document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for setools operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_conversion() {
        let error: Error = QueryError::InvalidRange { low: 10, high: 1 }.into();
        assert!(matches!(
            error,
            Error::Query(QueryError::InvalidRange { low: 10, high: 1 })
        ));
        assert_eq!(
            error.to_string(),
            "Query error: Invalid range: low 10 is greater than high 1"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let error: Error = err.into();
        assert!(matches!(error, Error::Serialization(_)));
    }
}
