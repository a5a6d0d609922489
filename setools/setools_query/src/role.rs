//! Role queries.

use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

use setools_core::error::{QueryError, Result};
use setools_core::policy::PolicyRep;
use setools_core::types::Role;

use crate::matcher::{matches_optional, LabelCriterion};
use crate::options::RoleQueryOptions;

/// A criterion on the set of types a role is authorized for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypesCriterion {
    /// The role's types must share at least one name with the set.
    Intersects(BTreeSet<String>),

    /// The role's types must be exactly the set.
    Equals(BTreeSet<String>),

    /// At least one of the role's types must match the pattern.
    Matches(LabelCriterion),
}

impl TypesCriterion {
    /// Whether `types` satisfies this criterion.
    pub fn matches(&self, types: &BTreeSet<String>) -> bool {
        match self {
            Self::Intersects(names) => !names.is_disjoint(types),
            Self::Equals(names) => names == types,
            Self::Matches(pattern) => types.iter().any(|name| pattern.matches(name)),
        }
    }
}

impl fmt::Display for TypesCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |names: &BTreeSet<String>| names.iter().cloned().collect::<Vec<_>>().join(" ");

        match self {
            Self::Intersects(names) => write!(f, "any of {{ {} }}", join(names)),
            Self::Equals(names) => write!(f, "{{ {} }}", join(names)),
            Self::Matches(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// A query over a policy's roles.
pub struct RoleQuery<'p, P: PolicyRep + ?Sized> {
    policy: &'p P,
    name: Option<LabelCriterion>,
    types: Option<TypesCriterion>,
}

impl<'p, P: PolicyRep + ?Sized> RoleQuery<'p, P> {
    /// Create a query with no criteria.
    pub fn new(policy: &'p P) -> Self {
        Self {
            policy,
            name: None,
            types: None,
        }
    }

    /// Create a query from saved options.
    pub fn with_options(policy: &'p P, options: &RoleQueryOptions) -> Result<Self> {
        let mut query = Self::new(policy);

        if let Some(name) = &options.name {
            query.set_name(name, options.name_regex)?;
        }

        if options.types_regex {
            match options.types.as_slice() {
                [pattern] => query.set_types_regex(pattern)?,
                _ => {
                    return Err(QueryError::InvalidArgument(format!(
                        "types_regex requires exactly one pattern, got {}",
                        options.types.len()
                    ))
                    .into())
                }
            }
        } else if !options.types.is_empty() {
            query.set_types(options.types.iter().cloned(), options.types_equal);
        }

        Ok(query)
    }

    pub fn name(&self) -> Option<&LabelCriterion> {
        self.name.as_ref()
    }

    /// Match the role name exactly, or as a regular expression.
    pub fn set_name(&mut self, name: &str, regex: bool) -> std::result::Result<(), QueryError> {
        let criterion = LabelCriterion::new(name, regex)?;
        debug!("Role query name set to {}", criterion);
        self.name = Some(criterion);
        Ok(())
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }

    pub fn types(&self) -> Option<&TypesCriterion> {
        self.types.as_ref()
    }

    /// Match roles by their authorized types.
    ///
    /// # Arguments
    ///
    /// * `types` - Type names.
    /// * `equal` - Require the role's types to be exactly `types`. Otherwise
    ///   any shared type is enough.
    pub fn set_types<I, S>(&mut self, types: I, equal: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = types.into_iter().map(Into::into).collect();
        let criterion = if equal {
            TypesCriterion::Equals(names)
        } else {
            TypesCriterion::Intersects(names)
        };

        debug!("Role query types set to {}", criterion);
        self.types = Some(criterion);
    }

    /// Match roles with at least one type matching `pattern`.
    pub fn set_types_regex(&mut self, pattern: &str) -> std::result::Result<(), QueryError> {
        let criterion = TypesCriterion::Matches(LabelCriterion::regex(pattern)?);
        debug!("Role query types set to {}", criterion);
        self.types = Some(criterion);
        Ok(())
    }

    pub fn clear_types(&mut self) {
        self.types = None;
    }

    /// Whether `role` satisfies every set criterion.
    pub fn matches(&self, role: &Role) -> bool {
        if !matches_optional(self.name.as_ref(), &role.name) {
            trace!("Role {} rejected on name", role.name);
            return false;
        }

        if let Some(types) = &self.types {
            if !types.matches(&role.types) {
                trace!("Role {} rejected on types", role.name);
                return false;
            }
        }

        true
    }

    /// Iterate over the matching roles, in policy order.
    pub fn results(&self) -> impl Iterator<Item = &'p Role> + '_ {
        let policy: &'p P = self.policy;
        debug!(
            "Generating role results (name: {:?}, types: {:?})",
            self.name.as_ref().map(LabelCriterion::text),
            self.types
        );

        policy.roles().iter().filter(move |role| self.matches(role))
    }
}

impl<P: PolicyRep + ?Sized> fmt::Debug for RoleQuery<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleQuery")
            .field("name", &self.name)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setools_core::error::Error;
    use setools_core::policy::InMemoryPolicy;

    fn policy() -> InMemoryPolicy {
        InMemoryPolicy::builder()
            .role(Role::new("object_r", Vec::<String>::new()))
            .role(Role::new("web_r", ["http_t", "http_cache_t"]))
            .role(Role::new("db_r", ["mysqld_t"]))
            .role(Role::new("ops_r", ["http_t", "mysqld_t", "sshd_t"]))
            .build()
            .unwrap()
    }

    fn names<P: PolicyRep>(query: &RoleQuery<'_, P>) -> Vec<String> {
        query.results().map(|role| role.name.clone()).collect()
    }

    #[test]
    fn test_unset() {
        let policy = policy();
        let query = RoleQuery::new(&policy);
        assert_eq!(names(&query), vec!["object_r", "web_r", "db_r", "ops_r"]);
    }

    #[test]
    fn test_name() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);

        query.set_name("db_r", false).unwrap();
        assert_eq!(names(&query), vec!["db_r"]);

        query.set_name("(web|ops)_r", true).unwrap();
        assert_eq!(names(&query), vec!["web_r", "ops_r"]);

        query.clear_name();
        assert_eq!(query.results().count(), 4);
    }

    #[test]
    fn test_types_intersect() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);

        query.set_types(["mysqld_t", "unused_t"], false);
        assert_eq!(names(&query), vec!["db_r", "ops_r"]);
    }

    #[test]
    fn test_types_equal() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);

        query.set_types(["http_cache_t", "http_t"], true);
        assert_eq!(names(&query), vec!["web_r"]);

        query.set_types(["http_t"], true);
        assert!(names(&query).is_empty());

        // the empty set only equals a role with no types
        query.set_types(Vec::<String>::new(), true);
        assert_eq!(names(&query), vec!["object_r"]);
    }

    #[test]
    fn test_types_regex() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);

        query.set_types_regex("ssh.*").unwrap();
        assert_eq!(names(&query), vec!["ops_r"]);

        assert!(matches!(
            query.set_types_regex("ssh("),
            Err(QueryError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_with_options() {
        let policy = policy();

        let options = RoleQueryOptions {
            name: Some(".*_r".to_string()),
            name_regex: true,
            types: vec!["http.*".to_string()],
            types_regex: true,
            ..Default::default()
        };
        let query = RoleQuery::with_options(&policy, &options).unwrap();
        assert_eq!(names(&query), vec!["web_r", "ops_r"]);

        let options = RoleQueryOptions {
            types: vec!["a".to_string(), "b".to_string()],
            types_regex: true,
            ..Default::default()
        };
        assert!(matches!(
            RoleQuery::with_options(&policy, &options),
            Err(Error::Query(QueryError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_types_criterion_display() {
        let names: BTreeSet<String> = ["b_t", "a_t"].into_iter().map(String::from).collect();
        assert_eq!(
            TypesCriterion::Intersects(names.clone()).to_string(),
            "any of { a_t b_t }"
        );
        assert_eq!(TypesCriterion::Equals(names).to_string(), "{ a_t b_t }");
    }
}
