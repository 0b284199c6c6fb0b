//! Protocol data types for IEEE 802.1AX link aggregation (LACP).
//!
//! This crate provides type-safe representations of the values carried in
//! LACPDU actor/partner TLVs and used by the LACP state machines:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`SystemId`]: system priority + system MAC, ordered per 802.1AX
//! - [`PortId`]: port priority + port number
//! - [`LacpState`]: the Actor_State/Partner_State bit octet
//! - [`PeerInfo`]: one side's view of a link partner

mod mac;
mod peer_info;
mod port_id;
mod state;
mod system_id;

pub use mac::MacAddress;
pub use peer_info::PeerInfo;
pub use port_id::PortId;
pub use state::LacpState;
pub use system_id::SystemId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid system identifier: {0} (expected \"priority,mac\")")]
    InvalidSystemId(String),

    #[error("invalid port identifier: {0} (expected \"priority,number\")")]
    InvalidPortId(String),
}
