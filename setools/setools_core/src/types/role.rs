//! Role type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A role and the types it is authorized for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// The name of this role.
    pub name: String,

    /// The types associated with this role.
    #[serde(default)]
    pub types: BTreeSet<String>,
}

impl Role {
    /// Create a role.
    pub fn new<I, S>(name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
