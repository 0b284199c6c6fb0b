//! Receive machine behavior tests: re-receipt idempotence, loopback
//! discard, timeout decay, mutual-agreement sync, and selection
//! invalidation.

use lacp_sm::{
    timeout, ActorConfig, Lacpdu, MachineFlags, PartnerDefaults, PortState, RxActions, RxMachine,
    RxState, Selection,
};
use lacp_types::{LacpState, MacAddress, PeerInfo, PortId, SystemId};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[derive(Debug, Default)]
struct Recorder {
    ntt: usize,
    kicks: usize,
    armed: Vec<Duration>,
}

impl RxActions for Recorder {
    fn assert_need_to_transmit(&mut self) {
        self.ntt += 1;
    }

    fn kick_transmit_machine(&mut self) {
        self.kicks += 1;
    }

    fn arm_timer(&mut self, duration: Duration) {
        self.armed.push(duration);
    }
}

fn our_mac() -> MacAddress {
    "02:00:00:00:00:0a".parse().unwrap()
}

fn peer_mac() -> MacAddress {
    "02:00:00:00:00:0b".parse().unwrap()
}

fn new_port() -> PortState {
    let config = ActorConfig::new("lag0/1".into(), our_mac(), 3).with_key(1000);
    PortState::new(config, PartnerDefaults::default())
}

fn peer_info(state: LacpState) -> PeerInfo {
    PeerInfo::new(
        SystemId::new(0x8000, peer_mac()),
        2000,
        PortId::new(0x80, 7),
        state,
    )
}

/// A frame whose partner fields correctly reflect our actor.
fn agreeing_pdu(port: &PortState) -> Lacpdu {
    Lacpdu::new(
        peer_info(LacpState::ACTIVITY | LacpState::AGGREGATION | LacpState::SYNC),
        port.actor,
        0,
    )
}

/// P1: delivering identical frame content twice leaves partner info and
/// selection where the first delivery put them; only the timer re-arm
/// repeats.
#[test]
fn same_pdu_twice_is_idempotent() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    let partner_after_first = port.partner;
    let selected_after_first = port.selected;
    let state_after_first = port.rx_state();

    machine.on_receive(&mut port, &pdu, &mut rec);

    assert_eq!(port.partner, partner_after_first);
    assert_eq!(port.selected, selected_after_first);
    assert_eq!(port.rx_state(), state_after_first);
    assert_eq!(rec.armed.len(), 2);
}

/// P2: a frame claiming our own system id is a loopback artifact and must
/// leave everything untouched, including the timer.
#[test]
fn loopback_frame_is_discarded() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let mut looped = agreeing_pdu(&port);
    looped.actor.system = port.actor.system;
    // A looped frame still differs from us in port number and key.
    looped.actor.port = PortId::new(0x80, 9);
    looped.actor.key = 42;

    let before_partner = port.partner;
    let before_flags = port.flags;
    machine.on_receive(&mut port, &looped, &mut rec);

    assert_eq!(port.partner, before_partner);
    assert_eq!(port.flags, before_flags);
    assert_eq!(port.selected, Selection::Unselected);
    assert!(rec.armed.is_empty());
    assert_eq!(rec.ntt + rec.kicks, 0);
}

/// P3: with no further frames, one expiry lands in EXPIRED (TIMEOUT forced
/// on, SYNC forced off) and a second lands in DEFAULTED with the partner
/// record fully replaced.
#[test]
fn monotonic_decay_current_expired_defaulted() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    assert_eq!(port.rx_state(), RxState::Current);
    assert!(port.partner.state.contains(LacpState::SYNC));

    machine.on_timer_expiry(&mut port, &mut rec);
    assert_eq!(port.rx_state(), RxState::Expired);
    assert!(port.partner.state.contains(LacpState::TIMEOUT));
    assert!(!port.partner.state.contains(LacpState::SYNC));
    assert_eq!(rec.armed.last(), Some(&timeout::SHORT_TIMEOUT_TIME));

    machine.on_timer_expiry(&mut port, &mut rec);
    assert_eq!(port.rx_state(), RxState::Defaulted);
    assert_eq!(port.partner, PartnerDefaults::default().record());
    assert!(port.flags.contains(MachineFlags::DEFAULTED));
    assert!(!port.flags.contains(MachineFlags::EXPIRED));
}

/// P4: SYNC requires mutual agreement. A frame whose partner fields claim
/// aggregation but misdescribe our actor must not be believed in sync,
/// whatever its own SYNC bit says.
#[test]
fn sync_cleared_when_partner_view_of_us_is_wrong() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let mut pdu = agreeing_pdu(&port);
    pdu.partner.system = SystemId::new(0x8000, "02:00:00:00:00:0c".parse().unwrap());
    assert!(pdu.partner.state.contains(LacpState::AGGREGATION));
    assert!(pdu.actor.state.contains(LacpState::SYNC));

    machine.on_receive(&mut port, &pdu, &mut rec);

    assert!(!port.partner.state.contains(LacpState::SYNC));
}

/// P5: a frame from a different endpoint, or one disagreeing on the
/// AGGREGATION bit, invalidates an existing SELECTED status.
#[test]
fn selected_invalidated_on_partner_change() {
    let machine = RxMachine::default();
    let mut rec = Recorder::default();

    // Changed port id.
    let mut port = new_port();
    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    port.selected = Selection::Selected;
    let mut moved = agreeing_pdu(&port);
    moved.actor.port = PortId::new(0x80, 8);
    machine.on_receive(&mut port, &moved, &mut rec);
    assert_eq!(port.selected, Selection::Unselected);

    // Changed system id.
    let mut port = new_port();
    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    port.selected = Selection::Selected;
    let mut moved = agreeing_pdu(&port);
    moved.actor.system = SystemId::new(0x8000, "02:00:00:00:00:0c".parse().unwrap());
    machine.on_receive(&mut port, &moved, &mut rec);
    assert_eq!(port.selected, Selection::Unselected);

    // Same endpoint, AGGREGATION bit flipped.
    let mut port = new_port();
    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    port.selected = Selection::Selected;
    let mut individual = agreeing_pdu(&port);
    individual.actor.state.clear(LacpState::AGGREGATION);
    machine.on_receive(&mut port, &individual, &mut rec);
    assert_eq!(port.selected, Selection::Unselected);
}

/// Same frame content again keeps SELECTED intact.
#[test]
fn selected_survives_unchanged_partner() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    port.selected = Selection::Selected;
    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);

    assert_eq!(port.selected, Selection::Selected);
}

/// End-to-end scenario from a fresh port: a frame from system B whose
/// partner fields already reflect us lands in CURRENT with SYNC retained,
/// the long countdown armed, and DEFAULTED cleared.
#[test]
fn first_frame_with_mutual_agreement() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    assert_eq!(port.rx_state(), RxState::Defaulted);
    assert_eq!(port.selected, Selection::Unselected);

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);

    assert_eq!(port.rx_state(), RxState::Current);
    assert_eq!(port.partner, pdu.actor);
    assert!(port.partner.state.contains(LacpState::SYNC));
    assert!(!port.flags.contains(MachineFlags::DEFAULTED));
    assert_eq!(rec.armed, vec![timeout::LONG_TIMEOUT_TIME]);
    assert_eq!(rec.kicks, 1);
}

/// Recovery: a port that decayed to DEFAULTED picks the partner back up
/// from the next frame.
#[test]
fn frame_after_defaulting_relearns_partner() {
    let machine = RxMachine::default();
    let mut port = new_port();
    let mut rec = Recorder::default();

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    machine.on_timer_expiry(&mut port, &mut rec);
    machine.on_timer_expiry(&mut port, &mut rec);
    assert_eq!(port.rx_state(), RxState::Defaulted);

    let pdu = agreeing_pdu(&port);
    machine.on_receive(&mut port, &pdu, &mut rec);
    assert_eq!(port.rx_state(), RxState::Current);
    assert_eq!(port.partner, pdu.actor);
}
