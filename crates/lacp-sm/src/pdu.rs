//! LACPDU structure and wire codec.
//!
//! Layout per IEEE 802.1AX clause 5.4.2: subtype and version octets, an
//! actor TLV and a partner TLV of 20 octets each, a collector TLV of 16
//! octets, a terminator, and 50 reserved octets, for a 110-octet body
//! following the Ethernet header. All multi-octet fields are big-endian.

use byteorder::{BigEndian, ByteOrder};
use lacp_types::{LacpState, MacAddress, PeerInfo, PortId, SystemId};
use thiserror::Error;

/// Length of a LACPDU body in octets (without the Ethernet header).
pub const LACPDU_LEN: usize = 110;

/// Slow Protocols subtype for LACP.
const SUBTYPE_LACP: u8 = 0x01;
/// LACP version implemented here.
const VERSION_1: u8 = 0x01;

const TLV_ACTOR: u8 = 0x01;
const TLV_PARTNER: u8 = 0x02;
const TLV_COLLECTOR: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0x00;

const PEER_TLV_LEN: u8 = 20;
const COLLECTOR_TLV_LEN: u8 = 16;

const ACTOR_TLV_OFF: usize = 2;
const PARTNER_TLV_OFF: usize = 22;
const COLLECTOR_TLV_OFF: usize = 42;
const TERMINATOR_OFF: usize = 58;

/// Errors from decoding a LACPDU body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PduError {
    /// Body shorter than the fixed LACPDU length.
    #[error("truncated LACPDU: {len} octets, need {LACPDU_LEN}")]
    Truncated {
        /// The actual body length.
        len: usize,
    },

    /// Slow Protocols subtype is not LACP.
    #[error("not a LACPDU: subtype {subtype:#04x}")]
    BadSubtype {
        /// The subtype octet found.
        subtype: u8,
    },

    /// Unknown LACP version.
    #[error("unsupported LACP version {version}")]
    BadVersion {
        /// The version octet found.
        version: u8,
    },

    /// A TLV header did not match the fixed layout.
    #[error("bad {name} TLV: type {tlv_type:#04x} length {tlv_len}")]
    BadTlv {
        /// TLV name ("actor", "partner", "collector", "terminator").
        name: &'static str,
        /// The TLV type octet found.
        tlv_type: u8,
        /// The TLV length octet found.
        tlv_len: u8,
    },
}

/// A decoded LACP data unit.
///
/// `actor` is what the sender claims about itself; `partner` is what the
/// sender last learned about us. The receive machine consumes this decoded
/// form only; framing, addressing, and FCS checks happen upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lacpdu {
    /// The sender's own info.
    pub actor: PeerInfo,
    /// The sender's record of its partner (i.e. of us).
    pub partner: PeerInfo,
    /// Maximum delay (in 10us units) before the collector delivers frames.
    pub collector_max_delay: u16,
}

impl Lacpdu {
    /// Creates a LACPDU from its fields.
    pub const fn new(actor: PeerInfo, partner: PeerInfo, collector_max_delay: u16) -> Self {
        Lacpdu {
            actor,
            partner,
            collector_max_delay,
        }
    }

    /// Decodes a LACPDU body.
    pub fn decode(buf: &[u8]) -> Result<Lacpdu, PduError> {
        if buf.len() < LACPDU_LEN {
            return Err(PduError::Truncated { len: buf.len() });
        }
        if buf[0] != SUBTYPE_LACP {
            return Err(PduError::BadSubtype { subtype: buf[0] });
        }
        if buf[1] != VERSION_1 {
            return Err(PduError::BadVersion { version: buf[1] });
        }

        check_tlv(buf, ACTOR_TLV_OFF, "actor", TLV_ACTOR, PEER_TLV_LEN)?;
        check_tlv(buf, PARTNER_TLV_OFF, "partner", TLV_PARTNER, PEER_TLV_LEN)?;
        check_tlv(
            buf,
            COLLECTOR_TLV_OFF,
            "collector",
            TLV_COLLECTOR,
            COLLECTOR_TLV_LEN,
        )?;
        if buf[TERMINATOR_OFF] != TLV_TERMINATOR || buf[TERMINATOR_OFF + 1] != 0 {
            return Err(PduError::BadTlv {
                name: "terminator",
                tlv_type: buf[TERMINATOR_OFF],
                tlv_len: buf[TERMINATOR_OFF + 1],
            });
        }

        Ok(Lacpdu {
            actor: decode_peer(&buf[ACTOR_TLV_OFF + 2..]),
            partner: decode_peer(&buf[PARTNER_TLV_OFF + 2..]),
            collector_max_delay: BigEndian::read_u16(&buf[COLLECTOR_TLV_OFF + 2..]),
        })
    }

    /// Encodes this LACPDU into a fixed 110-octet body.
    pub fn encode(&self) -> [u8; LACPDU_LEN] {
        let mut buf = [0u8; LACPDU_LEN];
        buf[0] = SUBTYPE_LACP;
        buf[1] = VERSION_1;

        buf[ACTOR_TLV_OFF] = TLV_ACTOR;
        buf[ACTOR_TLV_OFF + 1] = PEER_TLV_LEN;
        encode_peer(&mut buf[ACTOR_TLV_OFF + 2..], &self.actor);

        buf[PARTNER_TLV_OFF] = TLV_PARTNER;
        buf[PARTNER_TLV_OFF + 1] = PEER_TLV_LEN;
        encode_peer(&mut buf[PARTNER_TLV_OFF + 2..], &self.partner);

        buf[COLLECTOR_TLV_OFF] = TLV_COLLECTOR;
        buf[COLLECTOR_TLV_OFF + 1] = COLLECTOR_TLV_LEN;
        BigEndian::write_u16(&mut buf[COLLECTOR_TLV_OFF + 2..], self.collector_max_delay);

        // Terminator TLV and trailing reserved octets stay zero.
        buf
    }
}

fn check_tlv(
    buf: &[u8],
    off: usize,
    name: &'static str,
    expect_type: u8,
    expect_len: u8,
) -> Result<(), PduError> {
    if buf[off] != expect_type || buf[off + 1] != expect_len {
        return Err(PduError::BadTlv {
            name,
            tlv_type: buf[off],
            tlv_len: buf[off + 1],
        });
    }
    Ok(())
}

/// Decodes the 16 info octets following a peer TLV header:
/// system priority, system MAC, key, port priority, port number, state.
fn decode_peer(buf: &[u8]) -> PeerInfo {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(&buf[2..8]);
    PeerInfo::new(
        SystemId::new(BigEndian::read_u16(buf), MacAddress::new(mac)),
        BigEndian::read_u16(&buf[8..]),
        PortId::new(BigEndian::read_u16(&buf[10..]), BigEndian::read_u16(&buf[12..])),
        LacpState::from_bits(buf[14]),
    )
}

fn encode_peer(buf: &mut [u8], info: &PeerInfo) {
    BigEndian::write_u16(buf, info.system.priority);
    buf[2..8].copy_from_slice(info.system.mac.as_bytes());
    BigEndian::write_u16(&mut buf[8..], info.key);
    BigEndian::write_u16(&mut buf[10..], info.port.priority);
    BigEndian::write_u16(&mut buf[12..], info.port.number);
    buf[14] = info.state.bits();
    // Three reserved octets follow the state; left zero.
}
