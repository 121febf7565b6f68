use core::fmt;

use crate::leds::{LedIndex, LedState};

/// Major number the LED device registers under.
pub const LED_MAJOR: u32 = 240;
pub const DEVICE_NAME: &str = "ledModule";
pub const CLASS_NAME: &str = "led";

const IOC_READ: u32 = 2;
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;

/// Linux `_IOR(ty, nr, int)`.
const fn ior_int(ty: u32, nr: u32) -> u32 {
    (IOC_READ << IOC_DIRSHIFT)
        | ((core::mem::size_of::<i32>() as u32) << IOC_SIZESHIFT)
        | (ty << IOC_TYPESHIFT)
        | (nr << IOC_NRSHIFT)
}

pub const LED_IOC_GET_STATE: u32 = ior_int(LED_MAJOR, 1);
pub const LED_IOC_SET_STATE: u32 = ior_int(LED_MAJOR, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Set { led: LedIndex, state: bool },
    Get { led: LedIndex },
    /// Replace all three indicators at once.
    SetAll { state: LedState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownCommand(u32),
    LedOutOfRange(u64),
    StateOutOfRange(u64),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownCommand(cmd) => write!(f, "unknown LED command 0x{:08X}", cmd),
            DecodeError::LedOutOfRange(led) => write!(f, "no LED with index {}", led),
            DecodeError::StateOutOfRange(state) => write!(f, "LED state must be 0 or 1, got {}", state),
        }
    }
}

impl ControlRequest {
    /// Decodes a command code and its integer parameter.
    ///
    /// Set carries `led * 10 + state`; Get carries the LED index alone.
    pub fn decode(command: u32, param: u64) -> Result<Self, DecodeError> {
        match command {
            LED_IOC_SET_STATE => {
                let raw_state = param % 10;
                let raw_led = (param / 10) % 10;
                let led = LedIndex::try_from(raw_led).map_err(DecodeError::LedOutOfRange)?;
                let state = match raw_state {
                    0 => false,
                    1 => true,
                    other => return Err(DecodeError::StateOutOfRange(other)),
                };
                Ok(ControlRequest::Set { led, state })
            }
            LED_IOC_GET_STATE => {
                let led = LedIndex::try_from(param).map_err(DecodeError::LedOutOfRange)?;
                Ok(ControlRequest::Get { led })
            }
            other => Err(DecodeError::UnknownCommand(other)),
        }
    }

    /// Inverse of [`decode`](Self::decode). `SetAll` has no command code.
    pub fn encode(&self) -> Option<(u32, u64)> {
        match *self {
            ControlRequest::Set { led, state } => {
                Some((LED_IOC_SET_STATE, led as u64 * 10 + state as u64))
            }
            ControlRequest::Get { led } => Some((LED_IOC_GET_STATE, led as u64)),
            ControlRequest::SetAll { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Updated,
    State(bool),
}

impl Response {
    /// Value handed back through the command interface: 0 for a completed
    /// set, 0/1 for a read.
    pub fn as_raw(self) -> i64 {
        match self {
            Response::Updated => 0,
            Response::State(on) => on as i64,
        }
    }
}
