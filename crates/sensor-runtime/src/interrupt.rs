//! Interrupt routing and the interrupt line collaborator.

use crate::register::ctrl3;

/// Events routed to the data interrupt line (CTRL3 INT2 bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptRouting {
    bits: u8,
}

impl InterruptRouting {
    /// Nothing routed.
    pub const NONE: Self = Self { bits: 0 };
    /// Data ready.
    pub const DATA_READY: Self = Self {
        bits: ctrl3::I2_DRDY,
    };
    /// FIFO watermark and overrun.
    pub const FIFO: Self = Self {
        bits: ctrl3::I2_WTM | ctrl3::I2_ORUN,
    };

    /// Creates routing from raw CTRL3 bits; bits outside the INT2 field are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & ctrl3::I2_MASK,
        }
    }

    /// Returns the CTRL3 INT2 bits.
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns `true` when no event is routed.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns `true` when data ready is routed.
    pub const fn data_ready(self) -> bool {
        self.bits & ctrl3::I2_DRDY != 0
    }

    /// Returns `true` when the FIFO watermark is routed.
    pub const fn watermark(self) -> bool {
        self.bits & ctrl3::I2_WTM != 0
    }

    /// Returns `true` when FIFO overrun is routed.
    pub const fn overrun(self) -> bool {
        self.bits & ctrl3::I2_ORUN != 0
    }
}

/// Host-side interrupt line control.
///
/// The runtime disables the line while a drain runs and re-enables it when
/// the drain completes, so handlers for one device never overlap.
pub trait InterruptSource {
    /// Allows the line to fire.
    fn enable(&mut self);
    /// Masks the line.
    fn disable(&mut self);
    /// Clears a latched occurrence, if the controller latches.
    fn acknowledge(&mut self) {}
}

/// No interrupt line wired.
impl InterruptSource for () {
    fn enable(&mut self) {}
    fn disable(&mut self) {}
}
