//! Declarative policy documents.
//!
//! A policy document describes an already-resolved policy in TOML or JSON:
//! its MLS symbols, its roles, and its port labeling rules. Documents are
//! plain data; validation happens when an [`InMemoryPolicy`] is built from
//! one.
//!
//! [`InMemoryPolicy`]: super::InMemoryPolicy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{QueryError, Result};
use crate::types::{PortconRange, Role};

/// MLS symbol declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlsSection {
    /// Sensitivity names in dominance order, lowest first
    pub sensitivities: Vec<String>,

    /// Category names in declaration order
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A port or port range as written in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// A single port number: `ports = 80`
    Number(u16),

    /// A pair of bounds: `ports = [8000, 8010]`
    Pair(u16, u16),

    /// Text: `ports = "8000-8010"`
    Text(String),
}

impl PortValue {
    /// Resolve to a validated port range.
    pub fn to_range(&self) -> std::result::Result<PortconRange, QueryError> {
        match self {
            Self::Number(port) => Ok(PortconRange::single(*port)),
            Self::Pair(low, high) => PortconRange::new(*low, *high),
            Self::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(port) => write!(f, "{}", port),
            Self::Pair(low, high) => write!(f, "{}-{}", low, high),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A port labeling rule as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortconEntry {
    /// Protocol name (`tcp`, `udp`) or number
    pub protocol: String,

    /// Port or port range
    pub ports: PortValue,

    /// Context as `user:role:type[:range]`
    pub context: String,
}

/// A complete policy document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// MLS symbols. When absent the policy has the single sensitivity `s0`.
    #[serde(default)]
    pub mls: Option<MlsSection>,

    /// Roles, in policy order
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Port labeling rules, in policy order
    #[serde(default)]
    pub portcons: Vec<PortconEntry>,
}

impl PolicyDocument {
    /// Load a document from a file.
    ///
    /// Files ending in `.json` are read as JSON; anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading policy document from {}", path.display());

        let content = std::fs::read_to_string(path)?;

        let document = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };

        debug!(
            "Policy document has {} roles and {} portcons",
            document.roles.len(),
            document.portcons.len()
        );

        Ok(document)
    }

    /// Parse a document from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
