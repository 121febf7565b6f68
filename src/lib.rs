//! Keyboard indicator (Caps/Num/Scroll Lock) control for the legacy PS/2
//! keyboard.
//!
//! [`Controller`] owns the logical LED state and mirrors it onto the keyboard
//! with the set-LEDs handshake. Requests come in as [`ControlRequest`]s,
//! either decoded from the device command interface ([`LedDevice`]) or parsed
//! from the `led` shell command ([`shell`]).

#![cfg_attr(not(test), no_std)]

#[cfg(any(test, feature = "sim"))]
extern crate alloc;

pub mod config;
pub mod controller;
pub mod device;
pub mod driver;
pub mod hardware;
pub mod leds;
pub mod logger;
pub mod request;
pub mod serial;
pub mod shell;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod store;

pub use config::{DriverConfig, LockDiscipline};
pub use controller::Controller;
pub use device::{ControlError, LedDevice};
pub use driver::{FailureCause, HandshakeError, HandshakeOutcome, HandshakeStage};
pub use leds::{encode, LedIndex, LedState, StatusWord};
pub use request::{ControlRequest, DecodeError, Response};
pub use store::LedStore;

use hardware::{pic::PicIrqLine, pit::PitDelay, ps2::Ps2Ports};

pub type Ps2Controller = Controller<Ps2Ports, PicIrqLine, PitDelay>;

/// Controller for the on-board i8042 keyboard, masking `config.irq_line`
/// during handshakes.
///
/// # Safety
///
/// Only one such controller may exist, and the PICs and PIT must already be
/// set up ([`hardware::pic::init`], [`hardware::pit::init`]) with IRQ0 calling
/// [`hardware::pit::timer_handler`].
pub unsafe fn ps2_controller(config: DriverConfig) -> Ps2Controller {
    Controller::new(Ps2Ports::new(), PicIrqLine::new(config.irq_line), PitDelay, config)
}
