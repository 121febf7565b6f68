use log::{info, warn};
use pc_keyboard::KeyCode;

use crate::config::{DriverConfig, LockDiscipline};
use crate::driver::{HandshakeError, HandshakeOutcome, Ps2Driver};
use crate::hardware::pic::IrqLine;
use crate::hardware::pit::Delay;
use crate::hardware::ps2::KeyboardPort;
use crate::leds::{LedIndex, LedState};
use crate::request::{ControlRequest, Response};
use crate::store::LedStore;

/// Indicator state plus the driver that mirrors it onto the keyboard.
///
/// Build one per keyboard at startup and share it by reference.
pub struct Controller<P, L, D> {
    store: LedStore,
    driver: Ps2Driver<P, L, D>,
}

impl<P: KeyboardPort, L: IrqLine, D: Delay> Controller<P, L, D> {
    pub fn new(port: P, irq: L, delay: D, config: DriverConfig) -> Self {
        Controller {
            store: LedStore::new(),
            driver: Ps2Driver::new(port, irq, delay, config),
        }
    }

    pub fn store(&self) -> &LedStore {
        &self.store
    }

    pub fn driver(&self) -> &Ps2Driver<P, L, D> {
        &self.driver
    }

    pub fn state(&self) -> LedState {
        self.store.snapshot()
    }

    /// Runs one request.
    ///
    /// Reads never touch the hardware and never fail. A write updates the
    /// stored state first and keeps it even when the keyboard rejects the new
    /// status word, so a failed set still reads back as the requested value.
    pub fn handle(&self, request: ControlRequest) -> Result<Response, HandshakeError> {
        match request {
            ControlRequest::Get { led } => Ok(Response::State(self.store.get(led))),
            ControlRequest::Set { led, state } => {
                info!("{} lock -> {}", led, if state { "on" } else { "off" });
                self.update(|leds| leds.set(led, state))?;
                Ok(Response::Updated)
            }
            ControlRequest::SetAll { state } => {
                info!("all indicators -> {}", state);
                self.update(|leds| *leds = state)?;
                Ok(Response::Updated)
            }
        }
    }

    pub fn set(&self, led: LedIndex, state: bool) -> Result<(), HandshakeError> {
        self.handle(ControlRequest::Set { led, state }).map(|_| ())
    }

    pub fn get(&self, led: LedIndex) -> bool {
        self.store.get(led)
    }

    /// The set that flips the indicator belonging to `key`, if it is a lock
    /// key.
    ///
    /// Meant for the keyboard interrupt handler, which must not run the
    /// handshake itself: it queues the request and dispatches it later. Falls
    /// back to `None` instead of spinning when the state is locked.
    pub fn lock_key_request(&self, key: KeyCode) -> Option<ControlRequest> {
        let led = LedIndex::from_key_code(key)?;
        let current = self.store.try_get(led)?;
        Some(ControlRequest::Set { led, state: !current })
    }

    fn update(&self, change: impl FnOnce(&mut LedState)) -> HandshakeOutcome {
        let outcome = match self.driver.config().lock_discipline {
            LockDiscipline::Split => {
                change(&mut *self.store.lock());
                let word = self.store.snapshot().encode();
                self.driver.push(word)
            }
            LockDiscipline::Linearizable => {
                let mut leds = self.store.lock();
                change(&mut *leds);
                let word = leds.encode();
                self.driver.push(word)
            }
        };

        if let Err(err) = &outcome {
            warn!("indicator state kept but keyboard not updated: {}", err);
        }
        outcome
    }
}
