/// How long the indicator state stays locked during a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDiscipline {
    /// The store lock covers only the memory write. Reads never wait on the
    /// keyboard, but concurrent sets may push status words that mix both
    /// writers' changes before settling on the last one.
    Split,
    /// The store lock is held across write, encode and push, so every pushed
    /// status word is exactly one set's result. Reads wait for in-flight
    /// handshakes.
    Linearizable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Status register polls allowed per byte before giving up.
    pub poll_limit: u32,
    /// Pause between the command ACK and the payload byte.
    pub settle_delay_ms: u64,
    pub irq_line: u8,
    pub lock_discipline: LockDiscipline,
}

impl DriverConfig {
    pub const DEFAULT: DriverConfig = DriverConfig {
        poll_limit: 100_000,
        settle_delay_ms: 50,
        irq_line: 1,
        lock_discipline: LockDiscipline::Split,
    };

    pub const fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    pub const fn with_settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    pub const fn with_irq_line(mut self, irq_line: u8) -> Self {
        self.irq_line = irq_line;
        self
    }

    pub const fn with_lock_discipline(mut self, lock_discipline: LockDiscipline) -> Self {
        self.lock_discipline = lock_discipline;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
