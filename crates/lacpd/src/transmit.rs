//! Boundary to the periodic transmit machine.
//!
//! The transmit machine itself lives with the frame I/O path; the receive
//! machine only ever signals it. This module provides the channel handle
//! the port actors signal through, plus a stub task that logs the requests
//! until a real transmitter is wired in.

use tokio::sync::mpsc;
use tracing::{debug, info};

/// A request to the periodic transmit machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRequest {
    /// NTT: send an out-of-cycle LACPDU for this port.
    NeedToTransmit { port: String },
    /// Re-evaluate transmit scheduling for this port now.
    Kick { port: String },
}

/// Cloneable handle for signaling the transmit machine.
#[derive(Debug, Clone)]
pub struct TxHandle {
    tx: mpsc::UnboundedSender<TxRequest>,
}

impl TxHandle {
    /// Creates a handle and the receiving end for the transmit task.
    pub fn channel() -> (TxHandle, mpsc::UnboundedReceiver<TxRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TxHandle { tx }, rx)
    }

    /// Asserts need-to-transmit for `port`. Fire-and-forget; if the
    /// transmit task is gone the daemon is shutting down anyway.
    pub fn assert_ntt(&self, port: &str) {
        let _ = self.tx.send(TxRequest::NeedToTransmit {
            port: port.to_string(),
        });
    }

    /// Kicks the transmit machine for `port`.
    pub fn kick(&self, port: &str) {
        let _ = self.tx.send(TxRequest::Kick {
            port: port.to_string(),
        });
    }
}

/// Runs the stub transmit task: drains requests and logs them.
pub async fn run_stub(mut rx: mpsc::UnboundedReceiver<TxRequest>) {
    while let Some(request) = rx.recv().await {
        match request {
            TxRequest::NeedToTransmit { port } => {
                info!(port = %port, "NTT asserted");
            }
            TxRequest::Kick { port } => {
                debug!(port = %port, "transmit machine kicked");
            }
        }
    }
    debug!("transmit stub exiting");
}
