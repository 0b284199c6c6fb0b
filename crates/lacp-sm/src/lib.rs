//! IEEE 802.1AX (802.3ad) LACP state machine engine.
//!
//! This crate implements the receive side of the Link Aggregation Control
//! Protocol as an in-memory protocol engine:
//!
//! - [`Lacpdu`]: the decoded control frame and its wire codec
//! - [`PortState`]: per-port mutable state owned by the port's machines
//! - [`RxMachine`]: the receive machine (CURRENT/EXPIRED/DEFAULTED)
//! - [`RxActions`]: the capability trait through which the machine reaches
//!   its collaborators (periodic transmit machine, timer subsystem)
//! - [`timeout`]: the protocol timer constants
//!
//! # Architecture
//!
//! The receive machine is pure computation over [`PortState`] plus
//! fire-and-forget side effects issued through [`RxActions`]. Frame
//! delivery and timer expiry must never run concurrently against the same
//! port; across ports the machines are fully independent. The embedding
//! (see the `lacpd` crate) guarantees this by running one task per port and
//! posting timer expiry onto the same event queue as received frames.
//!
//! # Example
//!
//! ```
//! use lacp_sm::{
//!     ActorConfig, Lacpdu, PartnerDefaults, PortState, RxActions, RxMachine, RxState,
//! };
//! use lacp_types::{LacpState, PeerInfo, PortId, SystemId};
//! use std::time::Duration;
//!
//! struct NoopActions;
//! impl RxActions for NoopActions {
//!     fn assert_need_to_transmit(&mut self) {}
//!     fn kick_transmit_machine(&mut self) {}
//!     fn arm_timer(&mut self, _duration: Duration) {}
//! }
//!
//! let config = ActorConfig::new(
//!     "lag0/1".into(),
//!     "02:00:00:00:00:01".parse().unwrap(),
//!     1,
//! );
//! let mut port = PortState::new(config, PartnerDefaults::default());
//! let machine = RxMachine::new(PartnerDefaults::default());
//!
//! // A frame from the partner: its own info as actor, its record of us
//! // as partner.
//! let peer = PeerInfo::new(
//!     SystemId::new(0x8000, "02:00:00:00:00:02".parse().unwrap()),
//!     7,
//!     PortId::new(0x80, 4),
//!     LacpState::ACTIVITY | LacpState::AGGREGATION | LacpState::SYNC,
//! );
//! let pdu = Lacpdu::new(peer, port.actor, 0);
//! machine.on_receive(&mut port, &pdu, &mut NoopActions);
//! assert_eq!(port.rx_state(), RxState::Current);
//! ```

mod defaults;
mod pdu;
mod port;
mod rx;
pub mod timeout;

pub use defaults::{DefaultPolicy, PartnerDefaults};
pub use pdu::{Lacpdu, PduError, LACPDU_LEN};
pub use port::{ActorConfig, MachineFlags, PortState, RxState, Selection};
pub use rx::{RxActions, RxMachine};
