use x86_64::instructions::port::{Port, PortReadOnly};

pub const PS2_DATA_PORT: u16 = 0x60;
/// Status register on read; controller commands go to the same port on write.
pub const PS2_STATUS_PORT: u16 = 0x64;

/// Controller status register bits.
pub mod status {
    /// A byte from the keyboard is waiting in the data port.
    pub const OUTPUT_FULL: u8 = 0x01;
    /// The controller has not consumed the last byte written yet.
    pub const INPUT_FULL: u8 = 0x02;
}

/// Keyboard command and reply bytes.
pub mod commands {
    pub const SET_LEDS: u8 = 0xED;
    pub const ACK: u8 = 0xFA;
    pub const RESEND: u8 = 0xFE;
}

/// Raw access to the keyboard controller's data and status registers.
///
/// Implementations do no waiting of their own; the handshake polls
/// [`read_status`](KeyboardPort::read_status) before every data access.
pub trait KeyboardPort {
    fn read_status(&mut self) -> u8;
    fn read_data(&mut self) -> u8;
    fn write_data(&mut self, byte: u8);
}

/// The legacy i8042 controller at ports 0x60/0x64.
pub struct Ps2Ports {
    data: Port<u8>,
    status: PortReadOnly<u8>,
}

impl Ps2Ports {
    /// # Safety
    ///
    /// The caller must own the i8042 controller; nothing else may drive ports
    /// 0x60/0x64 while this value is in use, apart from the keyboard interrupt
    /// handler, which the handshake masks out.
    pub const unsafe fn new() -> Self {
        Ps2Ports {
            data: Port::new(PS2_DATA_PORT),
            status: PortReadOnly::new(PS2_STATUS_PORT),
        }
    }
}

impl KeyboardPort for Ps2Ports {
    fn read_status(&mut self) -> u8 {
        unsafe { self.status.read() }
    }

    fn read_data(&mut self) -> u8 {
        unsafe { self.data.read() }
    }

    fn write_data(&mut self, byte: u8) {
        unsafe { self.data.write(byte) }
    }
}
