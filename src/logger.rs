use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::serial;

/// `log` backend writing `[LEVEL] target: message` lines to COM1.
pub struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

/// One log line, newline included.
pub fn write_record(out: &mut impl Write, record: &Record) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = serial::with_serial(|port| write_record(port, record));
        }
    }

    fn flush(&self) {}
}

/// Installs the serial logger. Fails if another logger got there first, in
/// which case COM1 is left untouched.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    serial::init();
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    struct Discard;

    impl Log for Discard {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            false
        }

        fn log(&self, _record: &Record) {}

        fn flush(&self) {}
    }

    static DISCARD: Discard = Discard;

    #[test]
    fn record_line_has_level_target_and_message() {
        let mut line = String::new();
        write_record(
            &mut line,
            &Record::builder()
                .level(Level::Warn)
                .target("kbd_leds::driver")
                .args(format_args!("keyboard answered 0x{:02X}", 0xFE))
                .build(),
        )
        .unwrap();
        assert_eq!(line, "[WARN] kbd_leds::driver: keyboard answered 0xFE\n");
    }

    #[test]
    fn init_refuses_a_second_logger() {
        // Nothing else in this test binary installs a logger.
        log::set_logger(&DISCARD).unwrap();
        assert!(init(LevelFilter::Debug).is_err());
    }
}
