use core::fmt;

use log::debug;

use crate::controller::Controller;
use crate::driver::HandshakeError;
use crate::hardware::pic::IrqLine;
use crate::hardware::pit::Delay;
use crate::hardware::ps2::KeyboardPort;
use crate::leds::{LedState, ParseLedStateError};
use crate::request::{ControlRequest, DecodeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    Decode(DecodeError),
    Parse(ParseLedStateError),
    Handshake(HandshakeError),
}

impl From<DecodeError> for ControlError {
    fn from(err: DecodeError) -> Self {
        ControlError::Decode(err)
    }
}

impl From<ParseLedStateError> for ControlError {
    fn from(err: ParseLedStateError) -> Self {
        ControlError::Parse(err)
    }
}

impl From<HandshakeError> for ControlError {
    fn from(err: HandshakeError) -> Self {
        ControlError::Handshake(err)
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Decode(err) => write!(f, "{}", err),
            ControlError::Parse(err) => write!(f, "{}", err),
            ControlError::Handshake(err) => write!(f, "{}", err),
        }
    }
}

/// Character-device style entry points over a [`Controller`].
pub struct LedDevice<'a, P, L, D> {
    controller: &'a Controller<P, L, D>,
}

impl<'a, P: KeyboardPort, L: IrqLine, D: Delay> LedDevice<'a, P, L, D> {
    pub fn new(controller: &'a Controller<P, L, D>) -> Self {
        LedDevice { controller }
    }

    pub fn ioctl(&self, command: u32, param: u64) -> Result<i64, ControlError> {
        let request = ControlRequest::decode(command, param)?;
        debug!("ioctl 0x{:08X} -> {:?}", command, request);
        Ok(self.controller.handle(request)?.as_raw())
    }

    /// Takes the three-digit text form (caps, num, scroll) and applies it in
    /// one go. Returns the number of bytes consumed.
    pub fn write(&self, buf: &[u8]) -> Result<usize, ControlError> {
        let text = core::str::from_utf8(buf).map_err(|_| ParseLedStateError)?;
        let state: LedState = text.parse()?;
        self.controller.handle(ControlRequest::SetAll { state })?;
        Ok(buf.len())
    }
}
