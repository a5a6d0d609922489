//! Query options.
//!
//! Options are plain data that can be saved alongside a policy and read back
//! from TOML or JSON. Nothing is validated until the options are applied to
//! a query.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use setools_core::error::Result;
use setools_core::policy::PortValue;

use crate::compare::MatchMode;

/// Options for a port labeling rule query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortconQueryOptions {
    /// Protocol name (`tcp`, `udp`) or number
    pub protocol: Option<String>,

    /// Context user
    pub user: Option<String>,

    /// Match the user as a regular expression
    pub user_regex: bool,

    /// Context role
    pub role: Option<String>,

    /// Match the role as a regular expression
    pub role_regex: bool,

    /// Context type
    #[serde(rename = "type")]
    pub type_: Option<String>,

    /// Match the type as a regular expression
    pub type_regex: bool,

    /// Context MLS range, such as `s0 - s1:c0.c4`
    pub range: Option<String>,

    pub range_overlap: bool,
    pub range_subset: bool,
    pub range_superset: bool,
    pub range_proper: bool,

    /// Port or port range
    pub ports: Option<PortValue>,

    pub ports_overlap: bool,
    pub ports_subset: bool,
    pub ports_superset: bool,
    pub ports_proper: bool,
}

impl PortconQueryOptions {
    /// Load options from a file.
    ///
    /// Files ending in `.json` are read as JSON; anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading portcon query options from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse options from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// The match mode selected by the `range_*` flags.
    pub fn range_match(&self) -> MatchMode {
        MatchMode::from_flags(
            self.range_overlap,
            self.range_subset,
            self.range_superset,
            self.range_proper,
        )
    }

    /// The match mode selected by the `ports_*` flags.
    pub fn ports_match(&self) -> MatchMode {
        MatchMode::from_flags(
            self.ports_overlap,
            self.ports_subset,
            self.ports_superset,
            self.ports_proper,
        )
    }
}

/// Options for a role query.
///
/// When `types_regex` is set, `types` must hold exactly one entry: the
/// pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleQueryOptions {
    /// Role name
    pub name: Option<String>,

    /// Match the name as a regular expression
    pub name_regex: bool,

    /// Type names, or a single pattern with `types_regex`
    pub types: Vec<String>,

    /// Require the role's types to equal `types` instead of intersecting it
    pub types_equal: bool,

    /// Match `types` as a regular expression
    pub types_regex: bool,
}

impl RoleQueryOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse options from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::RangeMatch;
    use setools_core::error::Error;

    #[test]
    fn test_defaults() {
        let options = PortconQueryOptions::from_toml_str("").unwrap();
        assert_eq!(options, PortconQueryOptions::default());
        assert_eq!(options.range_match(), MatchMode::EXACT);
        assert_eq!(options.ports_match(), MatchMode::EXACT);
    }

    #[test]
    fn test_from_toml_str() {
        let options = PortconQueryOptions::from_toml_str(
            r#"
            protocol = "tcp"
            user = "user11(a|b)"
            user_regex = true
            type = "type30"
            range = "s2:c1,c2 - s2:c0.c3"
            range_overlap = true
            ports = [50501, 50509]
            ports_subset = true
            ports_proper = true
            "#,
        )
        .unwrap();

        assert_eq!(options.protocol.as_deref(), Some("tcp"));
        assert!(options.user_regex);
        assert_eq!(options.type_.as_deref(), Some("type30"));
        assert!(!options.type_regex);
        assert_eq!(options.ports, Some(PortValue::Pair(50501, 50509)));
        assert_eq!(options.range_match().relation, RangeMatch::Overlap);
        assert_eq!(
            options.ports_match(),
            MatchMode::new(RangeMatch::Subset, true)
        );
    }

    #[test]
    fn test_from_json_str() {
        let options = PortconQueryOptions::from_json_str(
            r#"{"role": "role20_r", "ports": "60100-60105", "ports_overlap": true}"#,
        )
        .unwrap();

        assert_eq!(options.role.as_deref(), Some("role20_r"));
        assert_eq!(options.ports, Some(PortValue::Text("60100-60105".to_string())));
        assert_eq!(options.ports_match().relation, RangeMatch::Overlap);
    }

    #[test]
    fn test_malformed_options() {
        let result = PortconQueryOptions::from_toml_str("user_regex = \"yes\"");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_role_options() {
        let options = RoleQueryOptions::from_toml_str(
            r#"
            name = "role.*_r"
            name_regex = true
            types = ["type30", "type31a"]
            types_equal = true
            "#,
        )
        .unwrap();

        assert_eq!(options.name.as_deref(), Some("role.*_r"));
        assert!(options.name_regex);
        assert_eq!(options.types.len(), 2);
        assert!(options.types_equal);
        assert!(!options.types_regex);
    }
}
