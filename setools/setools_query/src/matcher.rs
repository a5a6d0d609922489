//! Label matching.
//!
//! Identifiers (users, roles, types) are matched either exactly or against
//! a regular expression that must cover the whole identifier.

use regex::Regex;
use std::fmt;

use setools_core::error::QueryError;

/// Compile `pattern` so that it only matches whole identifiers.
pub fn compile_pattern(pattern: &str) -> Result<Regex, QueryError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|err| QueryError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// A criterion on an identifier.
///
/// In regex mode the pattern is compiled once, when the criterion is
/// created.
#[derive(Debug, Clone)]
pub struct LabelCriterion {
    text: String,
    pattern: Option<Regex>,
}

impl LabelCriterion {
    /// A criterion matching `text` exactly.
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern: None,
        }
    }

    /// A criterion matching identifiers that `pattern` matches in full.
    pub fn regex(pattern: impl Into<String>) -> Result<Self, QueryError> {
        let text = pattern.into();
        let pattern = compile_pattern(&text)?;

        Ok(Self {
            text,
            pattern: Some(pattern),
        })
    }

    /// Build an exact or regex criterion.
    pub fn new(text: impl Into<String>, regex: bool) -> Result<Self, QueryError> {
        if regex {
            Self::regex(text)
        } else {
            Ok(Self::exact(text))
        }
    }

    /// The criterion as given.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this criterion is a regular expression.
    pub fn is_regex(&self) -> bool {
        self.pattern.is_some()
    }

    /// Whether `candidate` satisfies this criterion.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(candidate),
            None => candidate == self.text,
        }
    }
}

impl PartialEq for LabelCriterion {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.is_regex() == other.is_regex()
    }
}

impl Eq for LabelCriterion {}

impl fmt::Display for LabelCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_regex() {
            write!(f, "/{}/", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// Match `candidate` against an optional criterion.
///
/// # Arguments
///
/// * `candidate` - The identifier to test.
/// * `criterion` - The criterion text, or `None` when the field is unset.
/// * `regex` - Whether `criterion` is a regular expression.
///
/// # Returns
///
/// * `Ok(true)` - If the criterion is unset or matches.
/// * `Ok(false)` - If the criterion does not match.
/// * `Err(QueryError::InvalidPattern)` - If `criterion` is not a valid pattern.
pub fn match_label(candidate: &str, criterion: Option<&str>, regex: bool) -> Result<bool, QueryError> {
    match criterion {
        None => Ok(true),
        Some(text) => Ok(LabelCriterion::new(text, regex)?.matches(candidate)),
    }
}

/// Check an optional criterion that has already been built.
pub(crate) fn matches_optional(criterion: Option<&LabelCriterion>, candidate: &str) -> bool {
    criterion.map_or(true, |criterion| criterion.matches(candidate))
}
