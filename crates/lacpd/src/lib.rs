//! Link aggregation control daemon.
//!
//! lacpd runs one receive-machine actor per configured aggregation port.
//! The frame-reception path delivers raw LACPDU bodies to a port's
//! [`PortHandle`]; the actor decodes them, drives the [`lacp_sm`] receive
//! machine, keeps the single countdown deadline, and forwards NTT/kick
//! signals to the transmit-machine boundary.
//!
//! # Serialization model
//!
//! Frames and timer expiry for one port are branches of one `select!` in
//! one task, so the receive machine is never entered concurrently for the
//! same port; distinct ports run on independent tasks.

pub mod actor;
pub mod config;
pub mod transmit;

pub use actor::{PortActor, PortEvent, PortHandle, PortSnapshot};
pub use config::{ConfigError, DaemonConfig, PortConfig};
pub use transmit::{TxHandle, TxRequest};
