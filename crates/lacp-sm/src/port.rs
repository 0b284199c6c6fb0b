//! Per-port LACP state.

use crate::{PartnerDefaults, timeout};
use lacp_types::{LacpState, MacAddress, PeerInfo, PortId, SystemId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Aggregator selection status, written by the receive machine and read
/// (and eventually written back to `Selected`) by the mux machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// An aggregator has been chosen for this port.
    Selected,
    /// No aggregator, or the previous choice was invalidated.
    #[default]
    Unselected,
    /// Held back from an otherwise compatible aggregator.
    Standby,
}

/// Receive machine state, derived from the machine flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// Live partner info, countdown running.
    Current,
    /// Countdown lapsed once; partner forced out of sync, short countdown
    /// running.
    Expired,
    /// Countdown lapsed twice (or no frame ever received); administrative
    /// default in effect, machine dormant until a frame arrives.
    Defaulted,
}

impl fmt::Display for RxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RxState::Current => "CURRENT",
            RxState::Expired => "EXPIRED",
            RxState::Defaulted => "DEFAULTED",
        };
        write!(f, "{}", s)
    }
}

/// Local per-port machine flags.
///
/// Distinct from the wire-format [`LacpState`] octet: these describe how
/// this port runs its machines, not what it tells the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MachineFlags(u8);

impl MachineFlags {
    /// LACP is enabled on this port; when clear, the receive machine
    /// ignores every event.
    pub const ENABLED: MachineFlags = MachineFlags(1 << 0);
    /// Active mode: transmit LACPDUs even with a passive partner.
    pub const ACTIVE: MachineFlags = MachineFlags(1 << 1);
    /// Prefer the short receive timeout.
    pub const FAST_TIMEOUT: MachineFlags = MachineFlags(1 << 2);
    /// The port may be aggregated with others; like ENABLED, the receive
    /// machine ignores every event while this is clear.
    pub const AGGREGATABLE: MachineFlags = MachineFlags(1 << 3);
    /// Receive machine is in the EXPIRED state.
    pub const EXPIRED: MachineFlags = MachineFlags(1 << 4);
    /// Partner info is the administrative default.
    pub const DEFAULTED: MachineFlags = MachineFlags(1 << 5);

    /// Returns true if every bit in `flags` is set.
    pub const fn contains(&self, flags: MachineFlags) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Sets the given bits.
    pub fn set(&mut self, flags: MachineFlags) {
        self.0 |= flags.0;
    }

    /// Clears the given bits.
    pub fn clear(&mut self, flags: MachineFlags) {
        self.0 &= !flags.0;
    }
}

impl std::ops::BitOr for MachineFlags {
    type Output = MachineFlags;

    fn bitor(self, rhs: MachineFlags) -> MachineFlags {
        MachineFlags(self.0 | rhs.0)
    }
}

/// Static configuration for this port's actor identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Port name for logging (e.g. "lag0/1").
    pub name: String,
    /// System MAC address.
    pub mac: MacAddress,
    /// Port number, unique within the system.
    pub port_number: u16,
    /// System priority (lower wins elections).
    pub system_priority: u16,
    /// Port priority.
    pub port_priority: u16,
    /// Operational key; ports sharing a key may aggregate together.
    pub key: u16,
    /// Active vs passive participation.
    pub active: bool,
    /// Ask the partner for short timeouts and expire on the short
    /// countdown ourselves.
    pub fast_timeouts: bool,
}

impl ActorConfig {
    /// Creates a config with the standard default priorities, the port
    /// number as the key, active mode, and long timeouts.
    pub fn new(name: String, mac: MacAddress, port_number: u16) -> Self {
        ActorConfig {
            name,
            mac,
            port_number,
            system_priority: 0x8000,
            port_priority: 0x80,
            key: port_number,
            active: true,
            fast_timeouts: false,
        }
    }

    /// Sets the operational key.
    pub fn with_key(mut self, key: u16) -> Self {
        self.key = key;
        self
    }

    /// Sets active (true) or passive (false) mode.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the timeout preference.
    pub fn with_fast_timeouts(mut self, fast: bool) -> Self {
        self.fast_timeouts = fast;
        self
    }
}

/// Per-port mutable state, owned exclusively by that port's state
/// machines.
///
/// `partner` is always either a record learned from a received frame or
/// exactly the administrative default record supplied at construction;
/// there is no third kind of partner record.
#[derive(Debug, Clone)]
pub struct PortState {
    /// Port name for logging.
    name: String,
    /// Our own info as transmitted to the partner.
    pub actor: PeerInfo,
    /// Last-learned or defaulted partner info.
    pub partner: PeerInfo,
    /// Local machine flags.
    pub flags: MachineFlags,
    /// Aggregator selection status.
    pub selected: Selection,
}

impl PortState {
    /// Creates the state for a port joining an aggregation group.
    ///
    /// The port starts DEFAULTED with the administrative-default partner
    /// record in effect and no aggregator selected.
    pub fn new(config: ActorConfig, defaults: PartnerDefaults) -> Self {
        let mut flags = MachineFlags::ENABLED | MachineFlags::AGGREGATABLE | MachineFlags::DEFAULTED;
        let mut actor_state = LacpState::AGGREGATION;
        if config.active {
            flags.set(MachineFlags::ACTIVE);
            actor_state.set(LacpState::ACTIVITY);
        }
        if config.fast_timeouts {
            flags.set(MachineFlags::FAST_TIMEOUT);
            actor_state.set(LacpState::TIMEOUT);
        }

        let actor = PeerInfo::new(
            SystemId::new(config.system_priority, config.mac),
            config.key,
            PortId::new(config.port_priority, config.port_number),
            actor_state,
        );

        PortState {
            name: config.name,
            actor,
            partner: defaults.record(),
            flags,
            selected: Selection::Unselected,
        }
    }

    /// Returns the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the receive machine state this port is in.
    pub fn rx_state(&self) -> RxState {
        if self.flags.contains(MachineFlags::DEFAULTED) {
            RxState::Defaulted
        } else if self.flags.contains(MachineFlags::EXPIRED) {
            RxState::Expired
        } else {
            RxState::Current
        }
    }

    /// Returns the countdown duration this port's own timeout preference
    /// calls for.
    pub fn countdown(&self) -> Duration {
        if self.flags.contains(MachineFlags::FAST_TIMEOUT) {
            timeout::SHORT_TIMEOUT_TIME
        } else {
            timeout::LONG_TIMEOUT_TIME
        }
    }
}
