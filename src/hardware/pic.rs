use pic8259::ChainedPics;
use spin::Mutex;
use x86_64::instructions::interrupts;

pub const PIC_1_OFFSET: u8 = 32;
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Remaps both PICs to [`PIC_1_OFFSET`]/[`PIC_2_OFFSET`].
pub fn init() {
    interrupts::without_interrupts(|| unsafe { PICS.lock().initialize() });
}

/// One hardware interrupt line that can be held off while the CPU talks to
/// the device behind it.
///
/// The mask is global to the machine, so implementations flip a shared flag
/// rather than anything per caller.
pub trait IrqLine {
    fn mask(&self);
    fn unmask(&self);
}

impl<T: IrqLine + ?Sized> IrqLine for &T {
    fn mask(&self) {
        (**self).mask()
    }

    fn unmask(&self) {
        (**self).unmask()
    }
}

/// Keeps an interrupt line masked for as long as it lives.
#[must_use = "the line is unmasked as soon as the guard is dropped"]
pub struct IrqMaskGuard<'a, L: IrqLine + ?Sized> {
    line: &'a L,
}

impl<'a, L: IrqLine + ?Sized> IrqMaskGuard<'a, L> {
    pub fn new(line: &'a L) -> Self {
        line.mask();
        IrqMaskGuard { line }
    }
}

impl<L: IrqLine + ?Sized> Drop for IrqMaskGuard<'_, L> {
    fn drop(&mut self) {
        self.line.unmask();
    }
}

/// An ISA IRQ behind the chained 8259 pair.
#[derive(Debug, Clone, Copy)]
pub struct PicIrqLine {
    irq: u8,
}

impl PicIrqLine {
    pub const fn new(irq: u8) -> Self {
        PicIrqLine { irq: irq & 0x0F }
    }

    fn update(&self, masked: bool) {
        let (chip, bit) = if self.irq < 8 {
            (0, self.irq)
        } else {
            (1, self.irq - 8)
        };

        // The PICS lock is also taken from interrupt handlers to send EOI.
        interrupts::without_interrupts(|| {
            let mut pics = PICS.lock();
            unsafe {
                let mut masks = pics.read_masks();
                if masked {
                    masks[chip] |= 1 << bit;
                } else {
                    masks[chip] &= !(1 << bit);
                }
                pics.write_masks(masks[0], masks[1]);
            }
        });
    }
}

impl IrqLine for PicIrqLine {
    fn mask(&self) {
        self.update(true);
    }

    fn unmask(&self) {
        self.update(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    struct Counting {
        masked: Cell<bool>,
        unmasks: Cell<u32>,
    }

    impl IrqLine for Counting {
        fn mask(&self) {
            self.masked.set(true);
        }

        fn unmask(&self) {
            self.masked.set(false);
            self.unmasks.set(self.unmasks.get() + 1);
        }
    }

    #[test]
    fn guard_unmasks_on_drop() {
        let line = Counting::default();
        {
            let _guard = IrqMaskGuard::new(&line);
            assert!(line.masked.get());
        }
        assert!(!line.masked.get());
        assert_eq!(line.unmasks.get(), 1);
    }

    #[test]
    fn guard_unmasks_on_early_return() {
        fn bail(line: &Counting) -> Result<(), ()> {
            let _guard = IrqMaskGuard::new(line);
            Err::<(), ()>(())?;
            Ok(())
        }

        let line = Counting::default();
        assert!(bail(&line).is_err());
        assert!(!line.masked.get());
    }
}
