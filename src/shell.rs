//! `led` shell command.
//!
//! ```text
//! led set <scroll|num|caps> <off|on>
//! led get <scroll|num|caps>
//! ```

use core::fmt::{self, Write};

use crate::controller::Controller;
use crate::hardware::pic::IrqLine;
use crate::hardware::pit::Delay;
use crate::hardware::ps2::KeyboardPort;
use crate::leds::LedIndex;
use crate::request::{ControlRequest, Response};

pub const USAGE: &str = "usage: led set <scroll|num|caps> <off|on> | led get <scroll|num|caps>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    WrongArgumentCount,
    UnknownCommand,
    UnknownLed,
    UnknownState,
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ShellError::WrongArgumentCount => "incorrect number of arguments",
            ShellError::UnknownCommand => "incorrect command to the LED driver",
            ShellError::UnknownLed => "unknown LED, expected scroll, num or caps",
            ShellError::UnknownState => "unknown state, expected off or on",
        };
        f.write_str(msg)
    }
}

fn parse_led(arg: &str) -> Result<LedIndex, ShellError> {
    LedIndex::ALL
        .into_iter()
        .find(|led| led.name() == arg)
        .ok_or(ShellError::UnknownLed)
}

fn parse_state(arg: &str) -> Result<bool, ShellError> {
    match arg {
        "off" => Ok(false),
        "on" => Ok(true),
        _ => Err(ShellError::UnknownState),
    }
}

/// Turns the words after `led` into a request.
pub fn parse(args: &[&str]) -> Result<ControlRequest, ShellError> {
    match args {
        ["set", led, state] => Ok(ControlRequest::Set {
            led: parse_led(led)?,
            state: parse_state(state)?,
        }),
        ["get", led] => Ok(ControlRequest::Get { led: parse_led(led)? }),
        ["set" | "get", ..] => Err(ShellError::WrongArgumentCount),
        [] => Err(ShellError::WrongArgumentCount),
        _ => Err(ShellError::UnknownCommand),
    }
}

/// Parses and runs one command line, writing what the user should see.
///
/// A successful set prints nothing; a get prints `on` or `off`.
pub fn run<P, L, D, W>(controller: &Controller<P, L, D>, line: &str, out: &mut W) -> fmt::Result
where
    P: KeyboardPort,
    L: IrqLine,
    D: Delay,
    W: Write,
{
    let mut words = [""; 4];
    let mut count = 0;
    for word in line.split_whitespace() {
        if count == words.len() {
            return writeln!(out, "{}\n{}", ShellError::WrongArgumentCount, USAGE);
        }
        words[count] = word;
        count += 1;
    }

    let request = match parse(&words[..count]) {
        Ok(request) => request,
        Err(err) => return writeln!(out, "{}\n{}", err, USAGE),
    };

    match controller.handle(request) {
        Ok(Response::State(on)) => writeln!(out, "{}", if on { "on" } else { "off" }),
        Ok(Response::Updated) => Ok(()),
        Err(err) => writeln!(out, "failed to update the keyboard: {}", err),
    }
}
