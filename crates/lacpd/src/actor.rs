//! Per-port actor task.
//!
//! Each aggregation port gets one task owning its [`PortState`] and receive
//! machine. Received frames and the countdown expiry are branches of the
//! same `select!`, so the two event sources are serialized per port without
//! a lock; re-arming replaces the single deadline, which is the implicit
//! cancellation the timer contract requires.

use std::future;
use std::time::Duration;

use lacp_sm::{Lacpdu, PartnerDefaults, PortState, RxActions, RxMachine, RxState, Selection};
use lacp_types::PeerInfo;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::PortConfig;
use crate::transmit::TxHandle;

/// Events delivered to a port actor.
#[derive(Debug)]
pub enum PortEvent {
    /// A raw LACPDU body from the frame-reception path.
    Frame(Vec<u8>),
    /// State inspection request (operational dumps, tests).
    Inspect(oneshot::Sender<PortSnapshot>),
    /// Stop the actor.
    Shutdown,
}

/// A point-in-time copy of the port's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSnapshot {
    /// Receive machine state.
    pub rx_state: RxState,
    /// Aggregator selection status.
    pub selected: Selection,
    /// Current partner record.
    pub partner: PeerInfo,
}

/// Handle for delivering events to a running port actor.
#[derive(Debug, Clone)]
pub struct PortHandle {
    name: String,
    events: mpsc::Sender<PortEvent>,
}

impl PortHandle {
    /// Returns the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delivers a raw LACPDU body to the actor.
    pub async fn deliver_frame(&self, body: Vec<u8>) {
        let _ = self.events.send(PortEvent::Frame(body)).await;
    }

    /// Fetches a snapshot of the port state, or None if the actor is gone.
    pub async fn inspect(&self) -> Option<PortSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.events.send(PortEvent::Inspect(tx)).await.ok()?;
        rx.await.ok()
    }

    /// Asks the actor to stop.
    pub async fn shutdown(&self) {
        let _ = self.events.send(PortEvent::Shutdown).await;
    }
}

/// Collaborator effects gathered during one machine invocation and applied
/// by the actor loop afterwards.
#[derive(Debug, Default)]
struct Effects {
    ntt: bool,
    kick: bool,
    arm: Option<Duration>,
}

impl RxActions for Effects {
    fn assert_need_to_transmit(&mut self) {
        self.ntt = true;
    }

    fn kick_transmit_machine(&mut self) {
        self.kick = true;
    }

    fn arm_timer(&mut self, duration: Duration) {
        self.arm = Some(duration);
    }
}

/// The actor owning one port's receive machine.
pub struct PortActor {
    port: PortState,
    machine: RxMachine,
    events: mpsc::Receiver<PortEvent>,
    tx: TxHandle,
    deadline: Option<Instant>,
}

impl PortActor {
    /// Depth of the per-port event queue; LACPDUs arrive at most a few
    /// per second, so a small buffer suffices.
    const QUEUE_DEPTH: usize = 16;

    /// Spawns an actor for the configured port.
    pub fn spawn(config: &PortConfig, tx: TxHandle) -> (PortHandle, JoinHandle<()>) {
        let defaults = PartnerDefaults::new(config.default_policy);
        let port = PortState::new(config.actor_config(), defaults);
        let (sender, events) = mpsc::channel(Self::QUEUE_DEPTH);

        let handle = PortHandle {
            name: config.name.clone(),
            events: sender,
        };
        let actor = PortActor {
            port,
            machine: RxMachine::new(defaults),
            events,
            tx,
            deadline: None,
        };
        (handle, tokio::spawn(actor.run()))
    }

    /// Runs the event loop until shutdown.
    ///
    /// The select is biased toward the timer so that an elapsed countdown
    /// is always observed before any later-queued event.
    async fn run(mut self) {
        info!(port = %self.port.name(), "port actor started");
        loop {
            let deadline = self.deadline;
            let countdown = async move {
                match deadline {
                    Some(at) => time::sleep_until(at).await,
                    None => future::pending().await,
                }
            };

            tokio::select! {
                biased;

                _ = countdown => {
                    self.deadline = None;
                    let mut effects = Effects::default();
                    self.machine.on_timer_expiry(&mut self.port, &mut effects);
                    self.apply(effects);
                }

                event = self.events.recv() => match event {
                    Some(PortEvent::Frame(body)) => self.handle_frame(&body),
                    Some(PortEvent::Inspect(reply)) => {
                        let _ = reply.send(PortSnapshot {
                            rx_state: self.port.rx_state(),
                            selected: self.port.selected,
                            partner: self.port.partner,
                        });
                    }
                    Some(PortEvent::Shutdown) | None => break,
                },
            }
        }
        info!(port = %self.port.name(), "port actor stopped");
    }

    fn handle_frame(&mut self, body: &[u8]) {
        let pdu = match Lacpdu::decode(body) {
            Ok(pdu) => pdu,
            Err(e) => {
                // Malformed frames are dropped here, before the machine.
                warn!(port = %self.port.name(), error = %e, "dropping bad LACPDU");
                return;
            }
        };

        let mut effects = Effects::default();
        self.machine.on_receive(&mut self.port, &pdu, &mut effects);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Effects) {
        if let Some(duration) = effects.arm {
            self.deadline = Some(Instant::now() + duration);
            debug!(port = %self.port.name(), ?duration, "countdown armed");
        }
        if effects.ntt {
            self.tx.assert_ntt(self.port.name());
        }
        if effects.kick {
            self.tx.kick(self.port.name());
        }
    }
}
