//! Port labeling rule queries.

use std::fmt;
use tracing::{debug, trace};

use setools_core::error::{QueryError, Result};
use setools_core::policy::PolicyRep;
use setools_core::types::{Portcon, PortconRange, Protocol, Range};

use crate::compare::MatchMode;
use crate::matcher::{matches_optional, LabelCriterion};
use crate::options::PortconQueryOptions;

/// A query over a policy's port labeling rules.
///
/// Each criterion is optional; an unset criterion accepts every rule. A rule
/// is returned when every set criterion accepts it. Criteria are validated
/// when they are set, so [`results`](Self::results) cannot fail.
pub struct PortconQuery<'p, P: PolicyRep + ?Sized> {
    policy: &'p P,

    protocol: Option<Protocol>,
    user: Option<LabelCriterion>,
    role: Option<LabelCriterion>,
    type_: Option<LabelCriterion>,

    range: Option<Range>,
    range_match: MatchMode,

    ports: Option<PortconRange>,
    ports_match: MatchMode,
}

impl<'p, P: PolicyRep + ?Sized> PortconQuery<'p, P> {
    /// Create a query with no criteria.
    pub fn new(policy: &'p P) -> Self {
        Self {
            policy,
            protocol: None,
            user: None,
            role: None,
            type_: None,
            range: None,
            range_match: MatchMode::EXACT,
            ports: None,
            ports_match: MatchMode::EXACT,
        }
    }

    /// Create a query from saved options.
    ///
    /// # Arguments
    ///
    /// * `policy` - The policy to query.
    /// * `options` - The criteria and match modes.
    ///
    /// # Returns
    ///
    /// * `Ok(PortconQuery)` - The query.
    /// * `Err` - The first invalid option: an unknown protocol, an invalid
    ///   pattern, malformed range text, or an inverted port range.
    pub fn with_options(policy: &'p P, options: &PortconQueryOptions) -> Result<Self> {
        let mut query = Self::new(policy);

        if let Some(protocol) = &options.protocol {
            query.set_protocol(protocol.parse()?);
        }
        if let Some(user) = &options.user {
            query.set_user(user, options.user_regex)?;
        }
        if let Some(role) = &options.role {
            query.set_role(role, options.role_regex)?;
        }
        if let Some(type_) = &options.type_ {
            query.set_type(type_, options.type_regex)?;
        }
        if let Some(range) = &options.range {
            query.set_range(range)?;
        }
        if let Some(ports) = &options.ports {
            let ports = ports.to_range()?;
            query.set_ports(ports.low(), ports.high())?;
        }

        query.set_range_match(options.range_match());
        query.set_ports_match(options.ports_match());

        Ok(query)
    }

    /// The policy being queried.
    pub fn policy(&self) -> &'p P {
        self.policy
    }

    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    /// Match only rules for `protocol`.
    pub fn set_protocol(&mut self, protocol: Protocol) {
        debug!("Portcon query protocol set to {}", protocol);
        self.protocol = Some(protocol);
    }

    pub fn clear_protocol(&mut self) {
        self.protocol = None;
    }

    pub fn user(&self) -> Option<&LabelCriterion> {
        self.user.as_ref()
    }

    /// Match the context user exactly, or as a regular expression.
    pub fn set_user(&mut self, user: &str, regex: bool) -> std::result::Result<(), QueryError> {
        let criterion = LabelCriterion::new(user, regex)?;
        debug!("Portcon query user set to {}", criterion);
        self.user = Some(criterion);
        Ok(())
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }

    pub fn role(&self) -> Option<&LabelCriterion> {
        self.role.as_ref()
    }

    /// Match the context role exactly, or as a regular expression.
    pub fn set_role(&mut self, role: &str, regex: bool) -> std::result::Result<(), QueryError> {
        let criterion = LabelCriterion::new(role, regex)?;
        debug!("Portcon query role set to {}", criterion);
        self.role = Some(criterion);
        Ok(())
    }

    pub fn clear_role(&mut self) {
        self.role = None;
    }

    pub fn type_(&self) -> Option<&LabelCriterion> {
        self.type_.as_ref()
    }

    /// Match the context type exactly, or as a regular expression.
    pub fn set_type(&mut self, type_: &str, regex: bool) -> std::result::Result<(), QueryError> {
        let criterion = LabelCriterion::new(type_, regex)?;
        debug!("Portcon query type set to {}", criterion);
        self.type_ = Some(criterion);
        Ok(())
    }

    pub fn clear_type(&mut self) {
        self.type_ = None;
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Match the context MLS range.
    ///
    /// # Arguments
    ///
    /// * `range` - Range text in the policy's notation, such as
    ///   `s0:c1 - s0:c0.c4`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the range was set.
    /// * `Err(QueryError::RangeSyntax)` - If the text does not resolve to a
    ///   valid range in the policy.
    pub fn set_range(&mut self, range: &str) -> std::result::Result<(), QueryError> {
        let range = self.policy.lookup_range(range)?;
        debug!("Portcon query range set to {}", range);
        self.range = Some(range);
        Ok(())
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    pub fn range_match(&self) -> MatchMode {
        self.range_match
    }

    /// Set how the query range is compared against each rule's range.
    pub fn set_range_match(&mut self, mode: MatchMode) {
        self.range_match = mode;
    }

    pub fn ports(&self) -> Option<PortconRange> {
        self.ports
    }

    /// Match the rule's port range.
    ///
    /// Fails with [`QueryError::InvalidRange`] when `low > high`.
    pub fn set_ports(&mut self, low: u16, high: u16) -> std::result::Result<(), QueryError> {
        let ports = PortconRange::new(low, high)?;
        debug!("Portcon query ports set to {}", ports);
        self.ports = Some(ports);
        Ok(())
    }

    pub fn clear_ports(&mut self) {
        self.ports = None;
    }

    pub fn ports_match(&self) -> MatchMode {
        self.ports_match
    }

    /// Set how the query port range is compared against each rule's ports.
    pub fn set_ports_match(&mut self, mode: MatchMode) {
        self.ports_match = mode;
    }

    /// Whether `rule` satisfies every set criterion.
    pub fn matches(&self, rule: &Portcon) -> bool {
        self.rejection(rule).is_none()
    }

    /// Iterate over the matching rules, in policy order.
    ///
    /// The scan is lazy and starts over on every call.
    pub fn results(&self) -> impl Iterator<Item = &'p Portcon> + '_ {
        let policy: &'p P = self.policy;
        debug!("Generating portcon results from {}", self);

        policy.portcons().iter().filter(move |rule| match self.rejection(rule) {
            Some(criterion) => {
                trace!("{} rejected on {}", rule, criterion);
                false
            }
            None => true,
        })
    }

    /// The first criterion that rejects `rule`, if any.
    fn rejection(&self, rule: &Portcon) -> Option<&'static str> {
        let context = rule.context();

        if self.protocol.is_some_and(|protocol| protocol != rule.protocol()) {
            return Some("protocol");
        }
        if !matches_optional(self.user.as_ref(), context.user()) {
            return Some("user");
        }
        if !matches_optional(self.role.as_ref(), context.role()) {
            return Some("role");
        }
        if !matches_optional(self.type_.as_ref(), context.type_()) {
            return Some("type");
        }
        if let Some(range) = &self.range {
            if !self.range_match.matches(range, context.range()) {
                return Some("range");
            }
        }
        if let Some(ports) = &self.ports {
            if !self.ports_match.matches(ports, &rule.ports()) {
                return Some("ports");
            }
        }

        None
    }
}

impl<P: PolicyRep + ?Sized> fmt::Debug for PortconQuery<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortconQuery")
            .field("protocol", &self.protocol)
            .field("user", &self.user)
            .field("role", &self.role)
            .field("type_", &self.type_)
            .field("range", &self.range)
            .field("range_match", &self.range_match)
            .field("ports", &self.ports)
            .field("ports_match", &self.ports_match)
            .finish_non_exhaustive()
    }
}

impl<P: PolicyRep + ?Sized> fmt::Display for PortconQuery<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "portcon query")?;

        if let Some(protocol) = self.protocol {
            write!(f, " protocol={}", protocol)?;
        }
        if let Some(user) = &self.user {
            write!(f, " user={}", user)?;
        }
        if let Some(role) = &self.role {
            write!(f, " role={}", role)?;
        }
        if let Some(type_) = &self.type_ {
            write!(f, " type={}", type_)?;
        }
        if let Some(range) = &self.range {
            write!(f, " range={} ({})", range, self.range_match)?;
        }
        if let Some(ports) = &self.ports {
            write!(f, " ports={} ({})", ports, self.ports_match)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::RangeMatch;
    use setools_core::error::Error;
    use setools_core::policy::{InMemoryPolicy, PortValue};

    fn policy() -> InMemoryPolicy {
        InMemoryPolicy::builder()
            .mls(["s0", "s1"], ["c0", "c1", "c2"])
            .portcon("tcp", "80", "system_u:object_r:http_port_t:s0")
            .portcon("udp", "53", "system_u:object_r:dns_port_t:s0")
            .portcon("tcp", "8000-8010", "system_u:object_r:http_cache_port_t:s0 - s1:c0.c2")
            .portcon("tcp", "22", "admin_u:object_r:ssh_port_t:s1")
            .build()
            .unwrap()
    }

    fn ports<P: PolicyRep>(query: &PortconQuery<'_, P>) -> Vec<String> {
        query.results().map(|rule| rule.ports().to_string()).collect()
    }

    #[test]
    fn test_unset_returns_all_in_order() {
        let policy = policy();
        let query = PortconQuery::new(&policy);

        assert_eq!(ports(&query), vec!["80", "53", "8000-8010", "22"]);
        // restartable
        assert_eq!(query.results().count(), 4);
    }

    #[test]
    fn test_protocol() {
        let policy = policy();
        let mut query = PortconQuery::new(&policy);

        query.set_protocol(Protocol::Udp);
        assert_eq!(ports(&query), vec!["53"]);

        query.clear_protocol();
        assert_eq!(query.results().count(), 4);
    }

    #[test]
    fn test_criteria_combine() {
        let policy = policy();
        let mut query = PortconQuery::new(&policy);

        query.set_type("http.*", true).unwrap();
        assert_eq!(ports(&query), vec!["80", "8000-8010"]);

        query.set_ports(8005, 8005).unwrap();
        query.set_ports_match(MatchMode::new(RangeMatch::Subset, false));
        assert_eq!(ports(&query), vec!["8000-8010"]);

        query.set_user("admin_u", false).unwrap();
        assert!(ports(&query).is_empty());
    }

    #[test]
    fn test_range_criterion() {
        let policy = policy();
        let mut query = PortconQuery::new(&policy);

        query.set_range("s1").unwrap();
        assert_eq!(ports(&query), vec!["22"]);

        query.set_range_match(MatchMode::new(RangeMatch::Subset, false));
        assert_eq!(ports(&query), vec!["8000-8010", "22"]);
    }

    #[test]
    fn test_setter_errors() {
        let policy = policy();
        let mut query = PortconQuery::new(&policy);

        assert!(matches!(
            query.set_user("user(", true),
            Err(QueryError::InvalidPattern { .. })
        ));
        assert!(query.user().is_none());

        assert_eq!(
            query.set_ports(90, 80),
            Err(QueryError::InvalidRange { low: 90, high: 80 })
        );
        assert!(matches!(
            query.set_range("s1 - s0"),
            Err(QueryError::RangeSyntax(_))
        ));
        assert!(matches!(
            query.set_range("s0:c9"),
            Err(QueryError::RangeSyntax(_))
        ));
    }

    #[test]
    fn test_with_options() {
        let policy = policy();
        let options = PortconQueryOptions {
            protocol: Some("6".to_string()),
            ports: Some(PortValue::Pair(8000, 8001)),
            ports_overlap: true,
            ..Default::default()
        };

        let query = PortconQuery::with_options(&policy, &options).unwrap();
        assert_eq!(query.protocol(), Some(Protocol::Tcp));
        assert_eq!(ports(&query), vec!["8000-8010"]);
    }

    #[test]
    fn test_with_options_errors() {
        let policy = policy();

        let options = PortconQueryOptions {
            protocol: Some("sctp".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PortconQuery::with_options(&policy, &options),
            Err(Error::Query(QueryError::InvalidArgument(_)))
        ));

        let options = PortconQueryOptions {
            ports: Some(PortValue::Text("90-80".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            PortconQuery::with_options(&policy, &options),
            Err(Error::Query(QueryError::InvalidRange { low: 90, high: 80 }))
        ));
    }

    #[test]
    fn test_dyn_policy() {
        let policy = policy();
        let policy: &dyn PolicyRep = &policy;

        let mut query = PortconQuery::new(policy);
        query.set_protocol(Protocol::Tcp);
        assert_eq!(query.results().count(), 3);
    }

    #[test]
    fn test_display() {
        let policy = policy();
        let mut query = PortconQuery::new(&policy);
        query.set_user("sys.*", true).unwrap();
        query.set_ports(80, 80).unwrap();

        assert_eq!(
            query.to_string(),
            "portcon query user=/sys.*/ ports=80 (exact)"
        );
    }
}
