use core::fmt::{self, Write};

use lazy_static::lazy_static;
use spin::Mutex;
use uart_16550::SerialPort;
use x86_64::instructions::interrupts;

pub const COM1: u16 = 0x3F8;

lazy_static! {
    pub static ref SERIAL1: Mutex<SerialPort> = {
        let mut serial_port = unsafe { SerialPort::new(COM1) };
        serial_port.init();
        Mutex::new(serial_port)
    };
}

/// Brings COM1 up ahead of the first log line.
pub fn init() {
    lazy_static::initialize(&SERIAL1);
}

/// Runs `f` against COM1 with interrupts off, so a handler logging at the
/// same time cannot deadlock on [`SERIAL1`].
pub fn with_serial<R>(f: impl FnOnce(&mut SerialPort) -> R) -> R {
    interrupts::without_interrupts(|| f(&mut *SERIAL1.lock()))
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // Nowhere to report a failed serial write.
    let _ = with_serial(|port| port.write_fmt(args));
}

/// Prints to the host through COM1.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => ($crate::serial::_print(format_args!($($arg)*)));
}

/// Prints to the host through COM1, appending a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)));
}
