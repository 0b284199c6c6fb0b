//! Port identifier (port priority + port number).

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a port within an aggregation system: a 16-bit priority
/// followed by the 16-bit port number.
///
/// Like [`SystemId`](crate::SystemId), ordering is priority first, then
/// port number, lower winning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortId {
    /// Port priority (lower is better).
    pub priority: u16,
    /// Port number, unique within the system. Zero is reserved.
    pub number: u16,
}

impl PortId {
    /// The administrative-default port id: lowest possible priority and
    /// the all-ones port number.
    pub const DEFAULT_PARTNER: PortId = PortId {
        priority: 0xffff,
        number: 0xffff,
    };

    /// Creates a new port id.
    pub const fn new(priority: u16, number: u16) -> Self {
        PortId { priority, number }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.priority, self.number)
    }
}

impl FromStr for PortId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prio, number) = s
            .split_once(',')
            .ok_or_else(|| ParseError::InvalidPortId(s.to_string()))?;
        let priority = prio
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidPortId(s.to_string()))?;
        let number = number
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidPortId(s.to_string()))?;
        Ok(PortId { priority, number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_display() {
        let id: PortId = "128,7".parse().unwrap();
        assert_eq!(id, PortId::new(128, 7));
        assert_eq!(id.to_string(), "128,7");
    }

    #[test]
    fn test_ordering() {
        assert!(PortId::new(1, 9) < PortId::new(2, 1));
        assert!(PortId::new(1, 1) < PortId::new(1, 2));
        assert!(PortId::new(128, 7) < PortId::DEFAULT_PARTNER);
    }

    #[test]
    fn test_invalid() {
        assert!("128".parse::<PortId>().is_err());
        assert!("128,x".parse::<PortId>().is_err());
        assert!("70000,1".parse::<PortId>().is_err());
    }
}
