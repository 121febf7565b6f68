use core::sync::atomic::{AtomicU64, Ordering};

use x86_64::instructions::port::Port;

const PIT_FREQUENCY: u64 = 1_193_182;
const PIT_HZ: u64 = 100;
const PIT_COMMAND_PORT: u16 = 0x43;
const PIT_CHANNEL_0_PORT: u16 = 0x40;
/// Channel 0, lobyte/hibyte, square wave generator.
const PIT_MODE_3: u8 = 0b0011_0110;
const MS_PER_TICK: u64 = 1000 / PIT_HZ;

static TIMER_TICKS: AtomicU64 = AtomicU64::new(0);

/// Blocking sleep used for the keyboard's settle time.
pub trait Delay {
    fn delay_ms(&self, ms: u64);
}

impl<T: Delay + ?Sized> Delay for &T {
    fn delay_ms(&self, ms: u64) {
        (**self).delay_ms(ms)
    }
}

pub fn init() {
    let divisor = (PIT_FREQUENCY / PIT_HZ) as u16;

    let mut command_port = Port::<u8>::new(PIT_COMMAND_PORT);
    let mut channel_port = Port::<u8>::new(PIT_CHANNEL_0_PORT);

    unsafe {
        command_port.write(PIT_MODE_3);
        channel_port.write((divisor & 0xFF) as u8);
        channel_port.write((divisor >> 8) as u8);
    }
}

/// Call from the IRQ0 handler.
pub fn timer_handler() {
    TIMER_TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn ticks() -> u64 {
    TIMER_TICKS.load(Ordering::Relaxed)
}

/// Spins until at least `ms` have passed, rounded up to whole ticks.
pub fn timer_wait_ms(ms: u64) {
    let start = ticks();
    let ticks_to_wait = ms.div_ceil(MS_PER_TICK);

    while ticks() < start + ticks_to_wait {
        core::hint::spin_loop();
    }
}

/// [`Delay`] driven by the PIT tick counter.
///
/// Only IRQ1 is masked during the LED handshake, so IRQ0 keeps the counter
/// moving while this waits. Needs [`init`] and a timer handler calling
/// [`timer_handler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PitDelay;

impl Delay for PitDelay {
    fn delay_ms(&self, ms: u64) {
        timer_wait_ms(ms);
    }
}
