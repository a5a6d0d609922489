//! MLS symbol table and level/range text parsing.
//!
//! The lattice owns the policy's sensitivity order and category universe and
//! resolves the conventional textual notation against them:
//!
//! ```text
//! level := sensitivity [ ":" cats ]
//! cats  := cat-item { "," cat-item }
//! cat-item := category | category "." category
//! range := level [ "-" level ]
//! ```

use std::collections::HashMap;

use crate::error::{PolicyError, QueryError};
use crate::types::{Category, Dominate, Level, Range, Sensitivity};

/// Sensitivity used by policies that declare no MLS section.
pub const DEFAULT_SENSITIVITY: &str = "s0";

/// A policy's sensitivity order and category universe.
#[derive(Debug, Clone)]
pub struct MlsLattice {
    /// Sensitivity names, lowest first. The index is the rank.
    sensitivities: Vec<String>,

    /// Category names in declaration order. The index is the id.
    categories: Vec<String>,

    sensitivity_index: HashMap<String, u32>,
    category_index: HashMap<String, u32>,
}

impl MlsLattice {
    /// Create a lattice.
    ///
    /// # Arguments
    ///
    /// * `sensitivities` - Sensitivity names in dominance order, lowest first.
    /// * `categories` - Category names in declaration order.
    ///
    /// # Returns
    ///
    /// * `Ok(MlsLattice)` - The lattice.
    /// * `Err` - If no sensitivity is declared or a name is declared twice.
    pub fn new<S, C>(sensitivities: S, categories: C) -> Result<Self, PolicyError>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let sensitivities: Vec<String> = sensitivities.into_iter().map(Into::into).collect();
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();

        if sensitivities.is_empty() {
            return Err(PolicyError::InvalidDocument(
                "at least one sensitivity must be declared".to_string(),
            ));
        }

        let sensitivity_index = index_names(&sensitivities, "sensitivity")?;
        let category_index = index_names(&categories, "category")?;

        Ok(Self {
            sensitivities,
            categories,
            sensitivity_index,
            category_index,
        })
    }

    /// Get a sensitivity by name.
    pub fn sensitivity(&self, name: &str) -> Option<Sensitivity> {
        self.sensitivity_index
            .get(name)
            .map(|&rank| Sensitivity::new(rank, name))
    }

    /// Get a category by name.
    pub fn category(&self, name: &str) -> Option<Category> {
        self.category_index
            .get(name)
            .map(|&id| Category::new(id, name))
    }

    /// Sensitivity names, lowest first.
    pub fn sensitivities(&self) -> &[String] {
        &self.sensitivities
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The lowest level of the lattice: lowest sensitivity, no categories.
    pub fn low_level(&self) -> Level {
        Level::new(
            Sensitivity::new(0, self.sensitivities[0].clone()),
            std::iter::empty(),
        )
    }

    /// Parse a level such as `s0`, `s1:c1,c2` or `s2:c0.c3,c5`.
    pub fn parse_level(&self, text: &str) -> Result<Level, QueryError> {
        let text = text.trim();
        let (sens_name, cats) = match text.split_once(':') {
            Some((sens, cats)) => (sens.trim(), Some(cats)),
            None => (text, None),
        };

        if sens_name.is_empty() {
            return Err(syntax(format!("missing sensitivity in level '{}'", text)));
        }

        let sensitivity = self
            .sensitivity(sens_name)
            .ok_or_else(|| syntax(format!("unknown sensitivity '{}'", sens_name)))?;

        let mut categories = Vec::new();
        if let Some(cats) = cats {
            for item in cats.split(',') {
                let item = item.trim();
                if item.is_empty() {
                    return Err(syntax(format!("empty category in level '{}'", text)));
                }

                match item.split_once('.') {
                    Some((first, last)) => categories.extend(self.category_run(first, last)?),
                    None => categories.push(self.lookup_category(item)?),
                }
            }
        }

        Ok(Level::new(sensitivity, categories))
    }

    /// Parse a range such as `s0`, `s0 - s1:c0.c4` or `s0:c1-s0:c0.c4`.
    ///
    /// The high level must dominate or equal the low level.
    pub fn parse_range(&self, text: &str) -> Result<Range, QueryError> {
        let parts: Vec<&str> = text.split('-').collect();

        match parts.as_slice() {
            [level] => Ok(Range::single(self.parse_level(level)?)),
            [low, high] => {
                let low = self.parse_level(low)?;
                let high = self.parse_level(high)?;

                if !high.dominance(&low).dominates_or_equal() {
                    return Err(syntax(format!(
                        "high level '{}' does not dominate low level '{}'",
                        high, low
                    )));
                }

                Ok(Range::new(low, high))
            }
            _ => Err(syntax(format!("malformed range '{}'", text.trim()))),
        }
    }

    fn lookup_category(&self, name: &str) -> Result<Category, QueryError> {
        self.category(name.trim())
            .ok_or_else(|| syntax(format!("unknown category '{}'", name.trim())))
    }

    /// Expand `first.last` to every category between the two, inclusive.
    fn category_run(&self, first: &str, last: &str) -> Result<Vec<Category>, QueryError> {
        let first = self.lookup_category(first)?;
        let last = self.lookup_category(last)?;

        if first.id() > last.id() {
            return Err(syntax(format!(
                "category run '{}.{}' is reversed",
                first, last
            )));
        }

        Ok((first.id()..=last.id())
            .map(|id| Category::new(id, self.categories[id as usize].clone()))
            .collect())
    }
}

impl Default for MlsLattice {
    /// A lattice with the single sensitivity `s0` and no categories.
    fn default() -> Self {
        let sensitivities = vec![DEFAULT_SENSITIVITY.to_string()];
        let sensitivity_index = HashMap::from([(DEFAULT_SENSITIVITY.to_string(), 0)]);

        Self {
            sensitivities,
            categories: Vec::new(),
            sensitivity_index,
            category_index: HashMap::new(),
        }
    }
}

fn index_names(names: &[String], kind: &'static str) -> Result<HashMap<String, u32>, PolicyError> {
    let mut index = HashMap::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        if index.insert(name.clone(), i as u32).is_some() {
            return Err(PolicyError::DuplicateName {
                kind,
                name: name.clone(),
            });
        }
    }

    Ok(index)
}

fn syntax(message: String) -> QueryError {
    QueryError::RangeSyntax(message)
}
