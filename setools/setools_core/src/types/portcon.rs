//! Port labeling rule types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::interval::Interval;
use super::mls::Range;
use crate::error::QueryError;

/// IANA protocol number for TCP.
pub const IPPROTO_TCP: u8 = 6;

/// IANA protocol number for UDP.
pub const IPPROTO_UDP: u8 = 17;

/// The network protocol of a port labeling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Transmission Control Protocol.
    Tcp,

    /// User Datagram Protocol.
    Udp,
}

impl Protocol {
    /// Get the name of this protocol as written in policy source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Get the IANA protocol number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Tcp => IPPROTO_TCP,
            Self::Udp => IPPROTO_UDP,
        }
    }

    /// Look up a protocol by IANA number.
    pub fn from_number(number: u8) -> Result<Self, QueryError> {
        match number {
            IPPROTO_TCP => Ok(Self::Tcp),
            IPPROTO_UDP => Ok(Self::Udp),
            other => Err(QueryError::InvalidArgument(format!(
                "unsupported protocol number {}",
                other
            ))),
        }
    }
}

impl FromStr for Protocol {
    type Err = QueryError;

    /// Accepts `tcp`/`udp` in any case, or the IANA protocol number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            other => match other.parse::<u8>() {
                Ok(number) => Self::from_number(number),
                Err(_) => Err(QueryError::InvalidArgument(format!(
                    "unknown protocol '{}'",
                    s
                ))),
            },
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive range of port numbers.
///
/// Ordering is lexicographic on `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PortconRange {
    low: u16,
    high: u16,
}

impl PortconRange {
    /// Create a port range, rejecting `low > high`.
    pub fn new(low: u16, high: u16) -> Result<Self, QueryError> {
        if low > high {
            return Err(QueryError::InvalidRange {
                low: low.into(),
                high: high.into(),
            });
        }

        Ok(Self { low, high })
    }

    /// A range covering a single port.
    pub fn single(port: u16) -> Self {
        Self {
            low: port,
            high: port,
        }
    }

    /// The first port in the range.
    pub fn low(&self) -> u16 {
        self.low
    }

    /// The last port in the range.
    pub fn high(&self) -> u16 {
        self.high
    }

    /// Whether the range covers exactly one port.
    pub fn is_single(&self) -> bool {
        self.low == self.high
    }
}

impl Interval for PortconRange {
    type Bound = u16;

    fn low(&self) -> &u16 {
        &self.low
    }

    fn high(&self) -> &u16 {
        &self.high
    }
}

impl TryFrom<(u16, u16)> for PortconRange {
    type Error = QueryError;

    fn try_from((low, high): (u16, u16)) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl FromStr for PortconRange {
    type Err = QueryError;

    /// Parses `80` or `8000-8010`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = |text: &str| {
            text.trim()
                .parse::<u16>()
                .map_err(|_| QueryError::InvalidArgument(format!("invalid port '{}'", text.trim())))
        };

        match s.split_once('-') {
            Some((low, high)) => Self::new(port(low)?, port(high)?),
            None => Ok(Self::single(port(s)?)),
        }
    }
}

impl fmt::Display for PortconRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// A security context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
    user: String,
    role: String,
    type_: String,
    range: Range,
}

impl Context {
    /// Create a context.
    pub fn new(
        user: impl Into<String>,
        role: impl Into<String>,
        type_: impl Into<String>,
        range: Range,
    ) -> Self {
        Self {
            user: user.into(),
            role: role.into(),
            type_: type_.into(),
            range,
        }
    }

    /// The SELinux user.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The type.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The MLS range.
    pub fn range(&self) -> &Range {
        &self.range
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.user, self.role, self.type_, self.range
        )
    }
}

/// A port labeling rule (`portcon`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Portcon {
    protocol: Protocol,
    ports: PortconRange,
    context: Context,
}

impl Portcon {
    /// Create a port labeling rule.
    pub fn new(protocol: Protocol, ports: PortconRange, context: Context) -> Self {
        Self {
            protocol,
            ports,
            context,
        }
    }

    /// The protocol of the rule.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The port range of the rule.
    pub fn ports(&self) -> PortconRange {
        self.ports
    }

    /// The context assigned to the ports.
    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl fmt::Display for Portcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "portcon {} {} {}",
            self.protocol, self.ports, self.context
        )
    }
}
