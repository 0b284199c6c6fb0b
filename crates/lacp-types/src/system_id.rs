//! System identifier (system priority + system MAC).

use crate::{MacAddress, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies an aggregation system: a 16-bit priority followed by the
/// system MAC address.
///
/// Ordering follows IEEE 802.1AX system-id comparison: the priority is the
/// most significant part, then the MAC address, numerically lower winning
/// any election. Equality of system ids is what the LACP machines use to
/// decide whether two frames came from the same system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId {
    /// System priority (lower is better).
    pub priority: u16,
    /// System MAC address.
    pub mac: MacAddress,
}

impl SystemId {
    /// The administrative-default system id: lowest possible priority and
    /// the all-ones MAC, i.e. "anyone".
    pub const DEFAULT_PARTNER: SystemId = SystemId {
        priority: 0xffff,
        mac: MacAddress::BROADCAST,
    };

    /// Creates a new system id.
    pub const fn new(priority: u16, mac: MacAddress) -> Self {
        SystemId { priority, mac }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.priority, self.mac)
    }
}

impl FromStr for SystemId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prio, mac) = s
            .split_once(',')
            .ok_or_else(|| ParseError::InvalidSystemId(s.to_string()))?;
        let priority = prio
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidSystemId(s.to_string()))?;
        let mac = mac
            .parse::<MacAddress>()
            .map_err(|_| ParseError::InvalidSystemId(s.to_string()))?;
        Ok(SystemId { priority, mac })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_display() {
        let id: SystemId = "32768,00:11:22:33:44:55".parse().unwrap();
        assert_eq!(id.priority, 32768);
        assert_eq!(id.mac.to_string(), "00:11:22:33:44:55");
        assert_eq!(id.to_string(), "32768,00:11:22:33:44:55");
    }

    #[test]
    fn test_priority_dominates_ordering() {
        let low_prio = SystemId::new(1, MacAddress::BROADCAST);
        let high_prio = SystemId::new(2, MacAddress::ZERO);
        assert!(low_prio < high_prio);
    }

    #[test]
    fn test_mac_breaks_priority_tie() {
        let a = SystemId::new(1, "00:00:00:00:00:01".parse().unwrap());
        let b = SystemId::new(1, "00:00:00:00:00:02".parse().unwrap());
        assert!(a < b);
    }

    #[test]
    fn test_default_partner_sorts_last() {
        let real = SystemId::new(32768, "00:11:22:33:44:55".parse().unwrap());
        assert!(real < SystemId::DEFAULT_PARTNER);
    }

    #[test]
    fn test_invalid() {
        assert!("32768".parse::<SystemId>().is_err());
        assert!("x,00:11:22:33:44:55".parse::<SystemId>().is_err());
        assert!("1,nonsense".parse::<SystemId>().is_err());
    }
}
