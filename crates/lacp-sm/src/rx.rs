//! The LACP receive machine.
//!
//! Consumes decoded LACPDUs and timer expiries for one port and drives the
//! CURRENT/EXPIRED/DEFAULTED lifecycle: partner records are learned from
//! frames, decay to EXPIRED when the countdown lapses, and fall back to the
//! administrative default when it lapses again. Selection and need-to-
//! transmit decisions are pushed to the sibling machines through
//! [`RxActions`].
//!
//! INITIALIZE and PORT_DISABLED handling live with the port's owner; a
//! port without LACP enabled, or one configured as an individual
//! (non-aggregatable) link, ignores every event here.

use crate::{Lacpdu, MachineFlags, PartnerDefaults, PortState, Selection};
use lacp_types::{LacpState, PeerInfo};
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

/// Capabilities the receive machine needs from its collaborators.
///
/// All three calls are fire-and-forget: they must not block, and arming
/// the timer replaces any previously pending expiry for the port. An
/// implementation is injected per invocation, which keeps the machine free
/// of collaborator ownership and lets tests record the effects.
pub trait RxActions {
    /// Asks the periodic transmit machine to send an out-of-cycle update.
    fn assert_need_to_transmit(&mut self);

    /// Asks the periodic transmit machine to run its logic now instead of
    /// waiting for its next tick.
    fn kick_transmit_machine(&mut self);

    /// (Re)arms the port's single countdown timer.
    fn arm_timer(&mut self, duration: Duration);
}

/// The receive machine. One instance may serve any number of ports; all
/// per-port state lives in [`PortState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RxMachine {
    defaults: PartnerDefaults,
}

impl RxMachine {
    /// Creates a receive machine with the given administrative-default
    /// partner record.
    pub const fn new(defaults: PartnerDefaults) -> Self {
        RxMachine { defaults }
    }

    /// Returns the configured defaults.
    pub const fn defaults(&self) -> PartnerDefaults {
        self.defaults
    }

    /// Handles a received, already validated LACPDU.
    ///
    /// Any state goes to CURRENT, except that frames looped back from our
    /// own system are discarded without side effects. Step order matters:
    /// the selection and NTT checks compare against the partner record
    /// before record-pdu overwrites it, and the countdown duration follows
    /// our own timeout preference.
    #[instrument(skip_all, fields(port = %port.name()))]
    pub fn on_receive(&self, port: &mut PortState, pdu: &Lacpdu, actions: &mut dyn RxActions) {
        if !port.flags.contains(MachineFlags::ENABLED | MachineFlags::AGGREGATABLE) {
            return;
        }
        if pdu.actor.same_system(&port.actor) {
            // Wiring loop: our own transmission reflected back.
            debug!("discarding looped-back LACPDU");
            return;
        }

        Self::update_selected(port, &pdu.actor);
        Self::update_ntt(port, pdu, actions);
        Self::record_pdu(port, pdu);
        port.flags.clear(MachineFlags::DEFAULTED);
        actions.arm_timer(port.countdown());
        port.flags.clear(MachineFlags::EXPIRED);
        actions.kick_transmit_machine();

        trace!(partner = %port.partner, selected = ?port.selected, "LACPDU recorded");
    }

    /// Handles expiry of the port's countdown timer.
    ///
    /// CURRENT decays to EXPIRED (partner forced out of sync, fast re-sync
    /// requested, short countdown); EXPIRED decays to DEFAULTED (partner
    /// replaced by the administrative default, no countdown: the machine
    /// is dormant until a frame arrives).
    #[instrument(skip_all, fields(port = %port.name()))]
    pub fn on_timer_expiry(&self, port: &mut PortState, actions: &mut dyn RxActions) {
        if !port.flags.contains(MachineFlags::ENABLED | MachineFlags::AGGREGATABLE) {
            return;
        }

        if !port.flags.contains(MachineFlags::EXPIRED) {
            // CURRENT -> EXPIRED. EXPIRED and the partner's TIMEOUT bit
            // travel together: an expired partner must re-sync fast.
            port.partner.state.clear(LacpState::SYNC);
            port.partner.state.set(LacpState::TIMEOUT);
            actions.arm_timer(crate::timeout::SHORT_TIMEOUT_TIME);
            port.flags.set(MachineFlags::EXPIRED);
            info!("partner info expired");
        } else {
            // EXPIRED -> DEFAULTED.
            let record = self.defaults.record();
            Self::update_selected(port, &record);
            port.partner = record;
            port.flags.set(MachineFlags::DEFAULTED);
            port.flags.clear(MachineFlags::EXPIRED);
            info!("partner info defaulted");
        }
    }

    /// Invalidates the aggregator selection if `candidate` is not the
    /// endpoint we had selected against, or disagrees with it on
    /// aggregatability.
    fn update_selected(port: &mut PortState, candidate: &PeerInfo) {
        if !port.partner.same_endpoint(candidate)
            || !port.partner.state.agrees_on(candidate.state, LacpState::AGGREGATION)
        {
            if port.selected == Selection::Selected {
                debug!(port = %port.name(), "partner changed, unselecting");
            }
            port.selected = Selection::Unselected;
        }
    }

    /// Asserts need-to-transmit when the partner's view of us is stale:
    /// its partner fields don't name our actor, or disagree with our actor
    /// state on ACTIVITY, SYNC, or AGGREGATION.
    fn update_ntt(port: &PortState, pdu: &Lacpdu, actions: &mut dyn RxActions) {
        let view_mask = LacpState::ACTIVITY | LacpState::SYNC | LacpState::AGGREGATION;
        if !port.actor.same_endpoint(&pdu.partner)
            || !port.actor.state.agrees_on(pdu.partner.state, view_mask)
        {
            actions.assert_need_to_transmit();
        }
    }

    /// Records the frame's actor fields as our partner info, then keeps
    /// the SYNC bit only under mutual agreement: the exchange is active,
    /// both sides agree on our aggregatability, and the partner's view
    /// names our actor exactly. A partner that is not aggregating at all
    /// is vacuously in sync.
    fn record_pdu(port: &mut PortState, pdu: &Lacpdu) {
        let active = pdu.actor.state.contains(LacpState::ACTIVITY)
            || (port.flags.contains(MachineFlags::ACTIVE)
                && pdu.partner.state.contains(LacpState::ACTIVITY));

        port.partner = pdu.actor;

        let mutual = active
            && port
                .actor
                .state
                .agrees_on(pdu.partner.state, LacpState::AGGREGATION)
            && port.actor.same_endpoint(&pdu.partner);
        let vacuous = !pdu.partner.state.contains(LacpState::AGGREGATION);

        if !(mutual || vacuous) {
            port.partner.state.clear(LacpState::SYNC);
        }
    }
}
