use core::fmt;
use core::str::FromStr;

use pc_keyboard::KeyCode;

/// One of the three keyboard indicators.
///
/// The discriminant is both the slot in [`LedState`] and the bit position in
/// the [`StatusWord`] sent to the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedIndex {
    ScrollLock = 0,
    NumLock = 1,
    CapsLock = 2,
}

impl LedIndex {
    /// Weight order used by the status word.
    pub const ALL: [LedIndex; 3] = [LedIndex::ScrollLock, LedIndex::NumLock, LedIndex::CapsLock];

    pub const fn slot(self) -> usize {
        self as usize
    }

    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            LedIndex::ScrollLock => "scroll",
            LedIndex::NumLock => "num",
            LedIndex::CapsLock => "caps",
        }
    }

    /// Lock key whose indicator this is.
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ScrollLock => Some(LedIndex::ScrollLock),
            KeyCode::NumpadLock => Some(LedIndex::NumLock),
            KeyCode::CapsLock => Some(LedIndex::CapsLock),
            _ => None,
        }
    }
}

impl TryFrom<u64> for LedIndex {
    type Error = u64;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(LedIndex::ScrollLock),
            1 => Ok(LedIndex::NumLock),
            2 => Ok(LedIndex::CapsLock),
            other => Err(other),
        }
    }
}

impl fmt::Display for LedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// On/off value of every indicator, all off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedState {
    leds: [bool; 3],
}

impl LedState {
    pub const fn new(scroll: bool, num: bool, caps: bool) -> Self {
        LedState { leds: [scroll, num, caps] }
    }

    pub const fn get(&self, led: LedIndex) -> bool {
        self.leds[led.slot()]
    }

    pub fn set(&mut self, led: LedIndex, on: bool) {
        self.leds[led.slot()] = on;
    }

    pub fn encode(&self) -> StatusWord {
        encode(self)
    }
}

/// Text form is three `0`/`1` digits in caps, num, scroll order, e.g. `"100"`
/// for Caps Lock alone.
impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for led in LedIndex::ALL.iter().rev() {
            f.write_str(if self.get(*led) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLedStateError;

impl fmt::Display for ParseLedStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected three 0/1 digits (caps, num, scroll)")
    }
}

impl FromStr for LedState {
    type Err = ParseLedStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim_end_matches(['\0', '\n']).as_bytes();
        if digits.len() != 3 {
            return Err(ParseLedStateError);
        }

        let mut state = LedState::default();
        for (digit, led) in digits.iter().zip(LedIndex::ALL.iter().rev()) {
            match digit {
                b'0' => state.set(*led, false),
                b'1' => state.set(*led, true),
                _ => return Err(ParseLedStateError),
            }
        }
        Ok(state)
    }
}

/// Byte pushed to the keyboard after the set-LEDs command.
///
/// Bit 0 is Scroll Lock, bit 1 Num Lock, bit 2 Caps Lock; bits 3-7 are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWord(u8);

impl StatusWord {
    /// Keeps the three indicator bits, drops the rest.
    pub const fn from_bits(bits: u8) -> Self {
        StatusWord(bits & 0b111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Inverse projection. Bits above Caps Lock are ignored.
    pub fn decode(self) -> LedState {
        let mut state = LedState::default();
        for led in LedIndex::ALL {
            state.set(led, self.0 & led.bit() != 0);
        }
        state
    }
}

pub fn encode(state: &LedState) -> StatusWord {
    let bits = LedIndex::ALL
        .iter()
        .filter(|led| state.get(**led))
        .fold(0u8, |acc, led| acc | led.bit());
    StatusWord(bits)
}
