//! The LACP state bit octet (Actor_State / Partner_State).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// The state octet carried in LACPDU actor and partner TLVs.
///
/// Bit assignments follow IEEE 802.1AX figure 5-8. The octet is kept as a
/// raw `u8` so it round-trips through the wire format unchanged; the named
/// constants and the set/clear helpers are the only way the state machines
/// touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LacpState(u8);

impl LacpState {
    /// No bits set.
    pub const EMPTY: LacpState = LacpState(0);

    /// LACP_Activity: active (set) vs passive (clear) participation.
    pub const ACTIVITY: LacpState = LacpState(1 << 0);
    /// LACP_Timeout: short (set) vs long (clear) timeout requested.
    pub const TIMEOUT: LacpState = LacpState(1 << 1);
    /// Aggregation: the link is aggregatable, not individual.
    pub const AGGREGATION: LacpState = LacpState(1 << 2);
    /// Synchronization: this side considers the link IN_SYNC.
    pub const SYNC: LacpState = LacpState(1 << 3);
    /// Collecting: frames received on this link are being collected.
    pub const COLLECTING: LacpState = LacpState(1 << 4);
    /// Distributing: frames are being transmitted on this link.
    pub const DISTRIBUTING: LacpState = LacpState(1 << 5);
    /// Defaulted: partner info is the administrative default, not learned.
    pub const DEFAULTED: LacpState = LacpState(1 << 6);
    /// Expired: the receive machine is in the EXPIRED state.
    pub const EXPIRED: LacpState = LacpState(1 << 7);

    /// Creates a state set from a raw wire octet.
    pub const fn from_bits(bits: u8) -> Self {
        LacpState(bits)
    }

    /// Returns the raw wire octet.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if every bit in `flags` is set.
    pub const fn contains(&self, flags: LacpState) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Sets the given bits.
    pub fn set(&mut self, flags: LacpState) {
        self.0 |= flags.0;
    }

    /// Clears the given bits.
    pub fn clear(&mut self, flags: LacpState) {
        self.0 &= !flags.0;
    }

    /// Returns true if this and `other` agree on every bit in `mask`.
    pub const fn agrees_on(&self, other: LacpState, mask: LacpState) -> bool {
        (self.0 ^ other.0) & mask.0 == 0
    }
}

impl BitOr for LacpState {
    type Output = LacpState;

    fn bitor(self, rhs: LacpState) -> LacpState {
        LacpState(self.0 | rhs.0)
    }
}

impl BitAnd for LacpState {
    type Output = LacpState;

    fn bitand(self, rhs: LacpState) -> LacpState {
        LacpState(self.0 & rhs.0)
    }
}

impl Not for LacpState {
    type Output = LacpState;

    fn not(self) -> LacpState {
        LacpState(!self.0)
    }
}

impl fmt::Display for LacpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(LacpState, &str); 8] = [
            (LacpState::ACTIVITY, "activity"),
            (LacpState::TIMEOUT, "timeout"),
            (LacpState::AGGREGATION, "aggregation"),
            (LacpState::SYNC, "sync"),
            (LacpState::COLLECTING, "collecting"),
            (LacpState::DISTRIBUTING, "distributing"),
            (LacpState::DEFAULTED, "defaulted"),
            (LacpState::EXPIRED, "expired"),
        ];

        let mut first = true;
        write!(f, "{{")?;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_bit_positions() {
        assert_eq!(LacpState::ACTIVITY.bits(), 0x01);
        assert_eq!(LacpState::TIMEOUT.bits(), 0x02);
        assert_eq!(LacpState::AGGREGATION.bits(), 0x04);
        assert_eq!(LacpState::SYNC.bits(), 0x08);
        assert_eq!(LacpState::COLLECTING.bits(), 0x10);
        assert_eq!(LacpState::DISTRIBUTING.bits(), 0x20);
        assert_eq!(LacpState::DEFAULTED.bits(), 0x40);
        assert_eq!(LacpState::EXPIRED.bits(), 0x80);
    }

    #[test]
    fn test_set_clear_contains() {
        let mut state = LacpState::EMPTY;
        state.set(LacpState::ACTIVITY | LacpState::SYNC);
        assert!(state.contains(LacpState::ACTIVITY));
        assert!(state.contains(LacpState::SYNC));
        assert!(!state.contains(LacpState::AGGREGATION));

        state.clear(LacpState::SYNC);
        assert!(!state.contains(LacpState::SYNC));
        assert!(state.contains(LacpState::ACTIVITY));
    }

    #[test]
    fn test_contains_requires_all_bits() {
        let state = LacpState::ACTIVITY;
        assert!(!state.contains(LacpState::ACTIVITY | LacpState::SYNC));
    }

    #[test]
    fn test_agrees_on() {
        let a = LacpState::ACTIVITY | LacpState::SYNC;
        let b = LacpState::ACTIVITY | LacpState::COLLECTING;
        assert!(a.agrees_on(b, LacpState::ACTIVITY));
        assert!(!a.agrees_on(b, LacpState::SYNC));
        assert!(a.agrees_on(b, LacpState::AGGREGATION));
    }

    #[test]
    fn test_display() {
        let state = LacpState::ACTIVITY | LacpState::AGGREGATION | LacpState::SYNC;
        assert_eq!(state.to_string(), "{activity,aggregation,sync}");
        assert_eq!(LacpState::EMPTY.to_string(), "{}");
    }
}
