//! Two sets racing on one controller.
//!
//! Under `LockDiscipline::Split` the indicator lock is released before the
//! handshake, so a read or a second set can slip in while the keyboard is
//! still being talked to. `LockDiscipline::Linearizable` closes that window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use kbd_leds::hardware::pit::Delay;
use kbd_leds::sim::{SimController, SimIrq};
use kbd_leds::{Controller, DriverConfig, LedIndex, LockDiscipline};

/// Parks the first handshake in its settle delay until the test lets it go.
struct Gate {
    armed: AtomicBool,
    entered: Barrier,
    release: Barrier,
}

impl Gate {
    fn new() -> Self {
        Gate {
            armed: AtomicBool::new(true),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        }
    }
}

impl Delay for Gate {
    fn delay_ms(&self, _ms: u64) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
    }
}

type GatedController = Controller<SimController, SimIrq, &'static Gate>;

fn gated(discipline: LockDiscipline) -> (Arc<GatedController>, SimController, &'static Gate) {
    let sim = SimController::acking();
    let gate: &'static Gate = Box::leak(Box::new(Gate::new()));
    let config = DriverConfig::DEFAULT.with_lock_discipline(discipline);
    let ctl = Controller::new(sim.clone(), SimIrq::new(), gate, config);
    (Arc::new(ctl), sim, gate)
}

#[test]
fn split_reads_do_not_wait_for_the_keyboard() {
    let (ctl, _sim, gate) = gated(LockDiscipline::Split);

    let first = {
        let ctl = ctl.clone();
        thread::spawn(move || ctl.set(LedIndex::CapsLock, true))
    };
    gate.entered.wait();

    // Handshake in flight: the new value is already visible.
    assert_eq!(ctl.store().try_get(LedIndex::CapsLock), Some(true));
    assert!(ctl.get(LedIndex::CapsLock));

    gate.release.wait();
    assert_eq!(first.join().unwrap(), Ok(()));
}

#[test]
fn split_second_set_lands_during_first_handshake() {
    let (ctl, sim, gate) = gated(LockDiscipline::Split);

    let first = {
        let ctl = ctl.clone();
        thread::spawn(move || ctl.set(LedIndex::CapsLock, true))
    };
    gate.entered.wait();

    // The store takes the second write at once; its push queues behind the
    // first handshake.
    let second = {
        let ctl = ctl.clone();
        thread::spawn(move || ctl.set(LedIndex::NumLock, true))
    };
    while !ctl.get(LedIndex::NumLock) {
        thread::yield_now();
    }

    gate.release.wait();
    assert_eq!(first.join().unwrap(), Ok(()));
    assert_eq!(second.join().unwrap(), Ok(()));

    // The first push went out without Num Lock even though the state already
    // had it; the keyboard only matches once the last set completes.
    assert_eq!(sim.pushed_words(), [0b100, 0b110]);
}

#[test]
fn linearizable_holds_state_lock_through_handshake() {
    let (ctl, sim, gate) = gated(LockDiscipline::Linearizable);

    let first = {
        let ctl = ctl.clone();
        thread::spawn(move || ctl.set(LedIndex::CapsLock, true))
    };
    gate.entered.wait();

    assert_eq!(ctl.store().try_get(LedIndex::CapsLock), None);

    gate.release.wait();
    assert_eq!(first.join().unwrap(), Ok(()));
    assert_eq!(ctl.store().try_get(LedIndex::CapsLock), Some(true));

    ctl.set(LedIndex::NumLock, true).unwrap();
    assert_eq!(sim.pushed_words(), [0b100, 0b110]);
}
