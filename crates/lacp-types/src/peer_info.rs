//! Peer info: one side's view of a link partner.

use crate::{LacpState, PortId, SystemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything one LACP participant says about itself in a LACPDU: the
/// actor TLV of a transmitted frame, and our stored record of the partner.
///
/// A `PeerInfo` is always replaced wholesale, either with the actor
/// fields of a received frame or with the administrative default record.
/// The single exception is the SYNC bit of a stored partner record, which
/// the receive machine may clear after assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerInfo {
    /// System identity (priority + MAC).
    pub system: SystemId,
    /// Operational key: ports with equal keys on both sides may aggregate.
    pub key: u16,
    /// Port identity (priority + number).
    pub port: PortId,
    /// The state octet this peer claims for itself.
    pub state: LacpState,
}

impl PeerInfo {
    /// Creates a new peer info record.
    pub const fn new(system: SystemId, key: u16, port: PortId, state: LacpState) -> Self {
        PeerInfo {
            system,
            key,
            port,
            state,
        }
    }

    /// Returns true if `other` names the same system (system id only).
    ///
    /// This is the comparison behind the loopback guard: a frame whose
    /// actor system id equals our own is our own transmission reflected
    /// back at us.
    pub fn same_system(&self, other: &PeerInfo) -> bool {
        self.system == other.system
    }

    /// Returns true if `other` names the same endpoint: system id, key,
    /// and port id all equal. State bits are not compared.
    pub fn same_endpoint(&self, other: &PeerInfo) -> bool {
        self.system == other.system && self.key == other.key && self.port == other.port
    }
}

impl fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sys={} key={} port={} state={}",
            self.system, self.key, self.port, self.state
        )
    }
}
