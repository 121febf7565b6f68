//! The set-LEDs handshake with the keyboard.
//!
//! ```text
//! mask IRQ -> write 0xED -> read ACK -> settle -> write status -> read ACK -> unmask IRQ
//! ```
//!
//! The first bad or missing reply ends the exchange. Nothing is retried.

use core::fmt;

use log::{debug, trace, warn};
use spin::Mutex;

use crate::config::DriverConfig;
use crate::hardware::pic::{IrqLine, IrqMaskGuard};
use crate::hardware::pit::Delay;
use crate::hardware::ps2::{commands, status, KeyboardPort};
use crate::leds::StatusWord;

/// Which acknowledgement never arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    /// Reply to the set-LEDs command byte.
    FirstAck,
    /// Reply to the status word.
    SecondAck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The keyboard answered with something other than ACK.
    BadAck(u8),
    /// The controller never became ready within the poll limit.
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeError {
    pub stage: HandshakeStage,
    pub cause: FailureCause,
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            HandshakeStage::FirstAck => "set-LEDs command",
            HandshakeStage::SecondAck => "LED status byte",
        };
        match self.cause {
            FailureCause::BadAck(byte) => {
                write!(f, "keyboard answered 0x{:02X} instead of ACK to the {}", byte, stage)
            }
            FailureCause::Timeout => write!(f, "keyboard controller timed out on the {}", stage),
        }
    }
}

pub type HandshakeOutcome = Result<(), HandshakeError>;

/// Sole owner of the keyboard controller's ports.
pub struct Ps2Driver<P, L, D> {
    port: Mutex<P>,
    irq: L,
    delay: D,
    config: DriverConfig,
}

impl<P: KeyboardPort, L: IrqLine, D: Delay> Ps2Driver<P, L, D> {
    pub fn new(port: P, irq: L, delay: D, config: DriverConfig) -> Self {
        Ps2Driver {
            port: Mutex::new(port),
            irq,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Sends `word` to the keyboard.
    ///
    /// One push runs at a time; a second caller spins until the first is
    /// done. The keyboard IRQ is masked for the whole exchange and unmasked on
    /// every return path.
    pub fn push(&self, word: StatusWord) -> HandshakeOutcome {
        let mut port = self.port.lock();
        let _masked = IrqMaskGuard::new(&self.irq);
        debug!("pushing LED status 0b{:03b}", word.bits());

        self.exchange(&mut *port, commands::SET_LEDS, HandshakeStage::FirstAck)?;
        trace!("set-LEDs command acknowledged, settling for {} ms", self.config.settle_delay_ms);
        self.delay.delay_ms(self.config.settle_delay_ms);

        self.exchange(&mut *port, word.bits(), HandshakeStage::SecondAck)?;
        debug!("LED status acknowledged");
        Ok(())
    }

    fn exchange(&self, port: &mut P, byte: u8, stage: HandshakeStage) -> HandshakeOutcome {
        let fail = |cause| {
            let err = HandshakeError { stage, cause };
            warn!("{}", err);
            err
        };

        self.write(port, byte).map_err(fail)?;
        trace!("sent 0x{:02X}", byte);
        match self.read(port).map_err(fail)? {
            commands::ACK => Ok(()),
            other => Err(fail(FailureCause::BadAck(other))),
        }
    }

    /// Waits for the input buffer to drain, then writes.
    fn write(&self, port: &mut P, byte: u8) -> Result<(), FailureCause> {
        self.poll(port, |s| s & status::INPUT_FULL == 0)?;
        port.write_data(byte);
        Ok(())
    }

    /// Waits for the output buffer to fill, then reads.
    fn read(&self, port: &mut P) -> Result<u8, FailureCause> {
        self.poll(port, |s| s & status::OUTPUT_FULL != 0)?;
        Ok(port.read_data())
    }

    fn poll(&self, port: &mut P, ready: impl Fn(u8) -> bool) -> Result<(), FailureCause> {
        for _ in 0..self.config.poll_limit {
            if ready(port.read_status()) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(FailureCause::Timeout)
    }
}
