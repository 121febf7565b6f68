//! Simulated keyboard controller, interrupt line and delay.
//!
//! Every type is a cheap handle over shared state, so a test can hand one
//! clone to the driver and keep another to look at what happened.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crossbeam_queue::ArrayQueue;
use spin::Mutex;

use crate::hardware::pic::IrqLine;
use crate::hardware::pit::Delay;
use crate::hardware::ps2::{commands, status, KeyboardPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    /// ACK every byte.
    Acking,
    /// Answer from the queued replies; nothing once they run out.
    Scripted,
    /// Accept bytes, never answer.
    Silent,
    /// Input buffer never drains.
    Busy,
    /// ACKs the first byte, then its input buffer stays full.
    BusyAfterCommand,
}

struct SimState {
    behaviour: Behaviour,
    replies: ArrayQueue<u8>,
    output: Mutex<Option<u8>>,
    written: Mutex<Vec<u8>>,
}

#[derive(Clone)]
pub struct SimController {
    state: Arc<SimState>,
}

impl SimController {
    fn with(behaviour: Behaviour, replies: &[u8]) -> Self {
        let queue = ArrayQueue::new(replies.len().max(1));
        for byte in replies {
            let _ = queue.push(*byte);
        }
        SimController {
            state: Arc::new(SimState {
                behaviour,
                replies: queue,
                output: Mutex::new(None),
                written: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn acking() -> Self {
        Self::with(Behaviour::Acking, &[])
    }

    /// Answers the n-th byte written with `replies[n]`.
    pub fn scripted(replies: &[u8]) -> Self {
        Self::with(Behaviour::Scripted, replies)
    }

    pub fn silent() -> Self {
        Self::with(Behaviour::Silent, &[])
    }

    pub fn busy() -> Self {
        Self::with(Behaviour::Busy, &[])
    }

    /// Takes the set-LEDs command, then never accepts the status byte.
    pub fn busy_after_command() -> Self {
        Self::with(Behaviour::BusyAfterCommand, &[])
    }

    /// Every byte the driver wrote to the data port, oldest first.
    pub fn written(&self) -> Vec<u8> {
        self.state.written.lock().clone()
    }

    /// Status bytes the keyboard received after a set-LEDs command.
    pub fn pushed_words(&self) -> Vec<u8> {
        self.written()
            .windows(2)
            .filter(|pair| pair[0] == commands::SET_LEDS)
            .map(|pair| pair[1])
            .collect()
    }
}

impl KeyboardPort for SimController {
    fn read_status(&mut self) -> u8 {
        let mut bits = 0;
        let busy = match self.state.behaviour {
            Behaviour::Busy => true,
            Behaviour::BusyAfterCommand => !self.state.written.lock().is_empty(),
            _ => false,
        };
        if busy {
            bits |= status::INPUT_FULL;
        }
        if self.state.output.lock().is_some() {
            bits |= status::OUTPUT_FULL;
        }
        bits
    }

    fn read_data(&mut self) -> u8 {
        self.state.output.lock().take().unwrap_or(0)
    }

    fn write_data(&mut self, byte: u8) {
        self.state.written.lock().push(byte);
        let reply = match self.state.behaviour {
            Behaviour::Acking | Behaviour::BusyAfterCommand => Some(commands::ACK),
            Behaviour::Scripted => self.state.replies.pop(),
            Behaviour::Silent | Behaviour::Busy => None,
        };
        *self.state.output.lock() = reply;
    }
}

#[derive(Default)]
struct IrqState {
    masked: AtomicBool,
    masks: AtomicU32,
    unmasks: AtomicU32,
}

/// Interrupt line that counts how often it was masked and unmasked.
#[derive(Clone, Default)]
pub struct SimIrq {
    state: Arc<IrqState>,
}

impl SimIrq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_masked(&self) -> bool {
        self.state.masked.load(Ordering::SeqCst)
    }

    pub fn mask_count(&self) -> u32 {
        self.state.masks.load(Ordering::SeqCst)
    }

    pub fn unmask_count(&self) -> u32 {
        self.state.unmasks.load(Ordering::SeqCst)
    }
}

impl IrqLine for SimIrq {
    fn mask(&self) {
        self.state.masked.store(true, Ordering::SeqCst);
        self.state.masks.fetch_add(1, Ordering::SeqCst);
    }

    fn unmask(&self) {
        self.state.masked.store(false, Ordering::SeqCst);
        self.state.unmasks.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&self, _ms: u64) {}
}

/// Returns at once but remembers each requested delay.
#[derive(Default)]
pub struct RecordingDelay {
    calls: Mutex<Vec<u64>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().clone()
    }
}

impl Delay for RecordingDelay {
    fn delay_ms(&self, ms: u64) {
        self.calls.lock().push(ms);
    }
}
