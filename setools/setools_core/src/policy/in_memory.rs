//! In-memory policy representation.
//!
//! This module provides a validated, immutable policy built from a
//! [`PolicyDocument`] or programmatically through [`InMemoryPolicyBuilder`].

use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use super::document::{MlsSection, PolicyDocument, PortValue, PortconEntry};
use super::lattice::MlsLattice;
use super::PolicyRep;
use crate::error::{PolicyError, QueryError, Result};
use crate::types::{Context, Level, Portcon, Protocol, Range, Role};

/// An in-memory policy.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicy {
    /// The MLS symbols.
    lattice: MlsLattice,

    /// The roles, in policy order.
    roles: Vec<Role>,

    /// The port labeling rules, in policy order.
    portcons: Vec<Portcon>,
}

impl InMemoryPolicy {
    /// Create a policy builder.
    pub fn builder() -> InMemoryPolicyBuilder {
        InMemoryPolicyBuilder::default()
    }

    /// Load and validate a policy document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let document = PolicyDocument::load(path)?;
        Self::from_document(&document)
    }

    /// Build a policy from a document.
    ///
    /// # Arguments
    ///
    /// * `document` - The policy document.
    ///
    /// # Returns
    ///
    /// * `Ok(InMemoryPolicy)` - The validated policy.
    /// * `Err` - If the MLS symbols, a role, or a port labeling rule is invalid.
    pub fn from_document(document: &PolicyDocument) -> Result<Self> {
        let lattice = match &document.mls {
            Some(mls) => MlsLattice::new(mls.sensitivities.clone(), mls.categories.clone())?,
            None => MlsLattice::default(),
        };

        let mut names = HashSet::new();
        for role in &document.roles {
            if !names.insert(role.name.as_str()) {
                return Err(PolicyError::DuplicateName {
                    kind: "role",
                    name: role.name.clone(),
                }
                .into());
            }
        }

        let mut policy = Self {
            lattice,
            roles: document.roles.clone(),
            portcons: Vec::with_capacity(document.portcons.len()),
        };

        for (index, entry) in document.portcons.iter().enumerate() {
            let portcon = policy
                .build_portcon(entry)
                .map_err(|err| PolicyError::InvalidRule {
                    index,
                    reason: err.to_string(),
                })?;
            policy.portcons.push(portcon);
        }

        debug!(
            "Built policy with {} sensitivities, {} categories, {} roles, {} portcons",
            policy.lattice.sensitivities().len(),
            policy.lattice.categories().len(),
            policy.roles.len(),
            policy.portcons.len()
        );

        Ok(policy)
    }

    /// The MLS symbols of this policy.
    pub fn lattice(&self) -> &MlsLattice {
        &self.lattice
    }

    /// Parse a context written as `user:role:type[:range]`.
    ///
    /// A context without a range gets the lowest level of the lattice.
    pub fn parse_context(&self, text: &str) -> std::result::Result<Context, QueryError> {
        let mut parts = text.trim().splitn(4, ':');
        let mut field = |what: &str| match parts.next().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(QueryError::InvalidArgument(format!(
                "context '{}' is missing its {}",
                text.trim(),
                what
            ))),
        };

        let user = field("user")?;
        let role = field("role")?;
        let type_ = field("type")?;
        let range = match parts.next() {
            Some(range) => self.lattice.parse_range(range)?,
            None => Range::single(self.lattice.low_level()),
        };

        Ok(Context::new(user, role, type_, range))
    }

    fn build_portcon(&self, entry: &PortconEntry) -> std::result::Result<Portcon, QueryError> {
        let protocol: Protocol = entry.protocol.parse()?;
        let ports = entry.ports.to_range()?;
        let context = self.parse_context(&entry.context)?;

        Ok(Portcon::new(protocol, ports, context))
    }
}

impl PolicyRep for InMemoryPolicy {
    fn portcons(&self) -> &[Portcon] {
        &self.portcons
    }

    fn roles(&self) -> &[Role] {
        &self.roles
    }

    fn lookup_level(&self, text: &str) -> std::result::Result<Level, QueryError> {
        self.lattice.parse_level(text)
    }

    fn lookup_range(&self, text: &str) -> std::result::Result<Range, QueryError> {
        self.lattice.parse_range(text)
    }
}

/// Builder for [`InMemoryPolicy`].
///
/// Collects a [`PolicyDocument`] and validates it on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyBuilder {
    document: PolicyDocument,
}

impl InMemoryPolicyBuilder {
    /// Declare the MLS symbols.
    pub fn mls<S, C>(mut self, sensitivities: S, categories: C) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.document.mls = Some(MlsSection {
            sensitivities: sensitivities.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a role.
    pub fn role(mut self, role: Role) -> Self {
        self.document.roles.push(role);
        self
    }

    /// Add a port labeling rule.
    pub fn portcon(
        mut self,
        protocol: impl Into<String>,
        ports: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        self.document.portcons.push(PortconEntry {
            protocol: protocol.into(),
            ports: PortValue::Text(ports.into()),
            context: context.into(),
        });
        self
    }

    /// Validate and build the policy.
    pub fn build(self) -> Result<InMemoryPolicy> {
        InMemoryPolicy::from_document(&self.document)
    }
}
