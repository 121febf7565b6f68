use spin::{Mutex, MutexGuard};

use crate::leds::{LedIndex, LedState};

/// The single authoritative copy of the indicator state.
///
/// Every accessor takes the lock for its own memory access only. Nothing here
/// is held across a hardware handshake, so two overlapping sets can each push
/// a status word that mixes in the other's write; the keyboard only ends up
/// matching whichever set finished last.
pub struct LedStore {
    leds: Mutex<LedState>,
}

impl LedStore {
    pub const fn new() -> Self {
        LedStore {
            leds: Mutex::new(LedState::new(false, false, false)),
        }
    }

    pub fn set(&self, led: LedIndex, on: bool) {
        self.leds.lock().set(led, on);
    }

    pub fn get(&self, led: LedIndex) -> bool {
        self.leds.lock().get(led)
    }

    /// Non-blocking read for callers that must not spin, such as interrupt
    /// handlers. `None` while someone else holds the lock.
    pub fn try_get(&self, led: LedIndex) -> Option<bool> {
        self.leds.try_lock().map(|leds| leds.get(led))
    }

    pub fn replace(&self, state: LedState) {
        *self.leds.lock() = state;
    }

    pub fn snapshot(&self) -> LedState {
        *self.leds.lock()
    }

    /// Holds the lock for as long as the guard lives.
    pub(crate) fn lock(&self) -> MutexGuard<'_, LedState> {
        self.leds.lock()
    }
}

impl Default for LedStore {
    fn default() -> Self {
        Self::new()
    }
}
