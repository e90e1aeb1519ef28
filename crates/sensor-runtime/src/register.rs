//! Register layout for L3G/LSM330-family gyroscopes.
//!
//! The runtime addresses configuration through logical [`Slot`]s; the
//! [`RegisterLayout`] turns a slot into a bus address. Bit-field constants
//! live in the per-register modules below.

/// Logical configuration register slot tracked by the resume state.
///
/// Declaration order is the order registers are written when the device is
/// reprogrammed after a power cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Output data rate, bandwidth, power mode and axis enables (CTRL1).
    ModeControl,
    /// High-pass filter configuration (CTRL2).
    HighPass,
    /// Interrupt line event routing (CTRL3).
    InterruptSelect,
    /// Full-scale range and block data update (CTRL4).
    Range,
    /// FIFO enable and filter path selection (CTRL5).
    FifoEnable,
    /// FIFO mode and watermark (FIFO_CTRL).
    FifoControl,
}

impl Slot {
    /// Number of tracked slots.
    pub const COUNT: usize = 6;

    /// All slots in write order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ModeControl,
        Self::HighPass,
        Self::InterruptSelect,
        Self::Range,
        Self::FifoEnable,
        Self::FifoControl,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Register addresses of one gyroscope part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterLayout {
    pub(crate) who_am_i: u8,
    pub(crate) expected_id: u8,
    pub(crate) ctrl1: u8,
    pub(crate) fifo_ctrl: u8,
    pub(crate) fifo_src: u8,
    pub(crate) out_x_l: u8,
}

impl RegisterLayout {
    /// LSM330 gyroscope die (also L3GD20).
    pub const LSM330: Self = Self {
        who_am_i: 0x0F,
        expected_id: who_am_i::LSM330,
        ctrl1: 0x20,
        fifo_ctrl: 0x2E,
        fifo_src: 0x2F,
        out_x_l: 0x28,
    };

    /// Returns a layout that expects a different WHO_AM_I value.
    ///
    /// Useful for register-compatible siblings such as the L3G4200D.
    #[must_use]
    pub const fn with_who_am_i(mut self, expected: u8) -> Self {
        self.expected_id = expected;
        self
    }

    /// Returns the WHO_AM_I value this layout expects.
    pub const fn expected_id(self) -> u8 {
        self.expected_id
    }

    /// Returns the bus address of a slot.
    ///
    /// CTRL1..CTRL5 are contiguous starting at CTRL1.
    pub const fn slot_addr(self, slot: Slot) -> u8 {
        match slot {
            Slot::FifoControl => self.fifo_ctrl,
            _ => self.ctrl1 + slot.index() as u8,
        }
    }

    pub(crate) const fn who_am_i_addr(self) -> u8 {
        self.who_am_i
    }

    pub(crate) const fn fifo_src_addr(self) -> u8 {
        self.fifo_src
    }

    pub(crate) const fn data_addr(self) -> u8 {
        self.out_x_l
    }
}

impl Default for RegisterLayout {
    fn default() -> Self {
        Self::LSM330
    }
}

/// WHO_AM_I values.
pub mod who_am_i {
    /// LSM330 gyroscope / L3GD20.
    pub const LSM330: u8 = 0xD4;
    /// L3G4200D.
    pub const L3G4200D: u8 = 0xD3;
}

/// CTRL1 bit fields.
pub mod ctrl1 {
    /// Output data rate field.
    pub const ODR_MASK: u8 = 0xC0;
    /// Bandwidth field.
    pub const BW_MASK: u8 = 0x30;
    /// Power mode and axis enable field.
    pub const POWER_AXES_MASK: u8 = 0x0F;
    /// Normal power mode.
    pub const PM_NORMAL: u8 = 0x08;
    /// Power-down.
    pub const PM_OFF: u8 = 0x00;
    /// X, Y and Z enabled.
    pub const ENABLE_ALL_AXES: u8 = 0x07;
    /// All axes disabled (sleep when combined with normal power).
    pub const ENABLE_NO_AXES: u8 = 0x00;

    /// 95 Hz output data rate.
    pub const ODR_95: u8 = 0x00;
    /// 190 Hz output data rate.
    pub const ODR_190: u8 = 0x40;
    /// 380 Hz output data rate.
    pub const ODR_380: u8 = 0x80;
    /// 760 Hz output data rate.
    pub const ODR_760: u8 = 0xC0;

    /// Bandwidth selection 0.
    pub const BW_00: u8 = 0x00;
    /// Bandwidth selection 1.
    pub const BW_01: u8 = 0x10;
    /// Bandwidth selection 2.
    pub const BW_10: u8 = 0x20;
    /// Bandwidth selection 3.
    pub const BW_11: u8 = 0x30;
}

/// CTRL3 (INT2 routing) bit fields.
pub mod ctrl3 {
    /// Data ready on INT2.
    pub const I2_DRDY: u8 = 0x08;
    /// FIFO watermark on INT2.
    pub const I2_WTM: u8 = 0x04;
    /// FIFO overrun on INT2.
    pub const I2_ORUN: u8 = 0x02;
    /// FIFO empty on INT2.
    pub const I2_EMPTY: u8 = 0x01;
    /// All INT2 routing bits.
    pub const I2_MASK: u8 = 0x0F;
}

/// CTRL4 bit fields.
pub mod ctrl4 {
    /// Block data update.
    pub const BDU: u8 = 0x80;
    /// Full-scale field.
    pub const FS_MASK: u8 = 0x30;
    /// +/-250 dps.
    pub const FS_250: u8 = 0x00;
    /// +/-500 dps.
    pub const FS_500: u8 = 0x10;
    /// +/-2000 dps.
    pub const FS_2000: u8 = 0x20;
}

/// CTRL5 bit fields.
pub mod ctrl5 {
    /// FIFO accumulation enable.
    pub const FIFO_EN: u8 = 0x40;
}

/// FIFO_CTRL bit fields.
pub mod fifo_ctrl {
    /// FIFO mode field.
    pub const MODE_MASK: u8 = 0xE0;
    /// Watermark field.
    pub const WTM_MASK: u8 = 0x1F;
    /// Hardware FIFO depth in samples.
    pub const DEPTH: u8 = 32;
}

/// FIFO_SRC bit fields.
pub mod fifo_src {
    /// Watermark reached.
    pub const WTM: u8 = 0x80;
    /// FIFO overrun.
    pub const OVRN: u8 = 0x40;
    /// FIFO empty.
    pub const EMPTY: u8 = 0x20;
    /// Stored sample count field.
    pub const FSS_MASK: u8 = 0x1F;
}
