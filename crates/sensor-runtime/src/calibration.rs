//! Calibration constants and the resume-state register cache.
//!
//! Every configuration change goes through [`CalibrationStore`], which keeps
//! the last intended value of each tracked register. After a power cycle the
//! device is reprogrammed from that cache alone.

use crate::config::GyroRange;
use crate::data::{ScaleFactor, gyro_udps_per_lsb};
use crate::error::Error;
use crate::interface::RegisterTransport;
use crate::logging::log_trace;
use crate::register::{RegisterLayout, Slot, ctrl1, ctrl4};

/// Merges `bits` into `current` under `mask`.
pub const fn mask_merge(current: u8, mask: u8, bits: u8) -> u8 {
    (bits & mask) | (current & !mask)
}

/// Last intended value of every tracked configuration register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResumeState {
    values: [u8; Slot::COUNT],
}

impl ResumeState {
    /// Power-on defaults: all axes on in normal mode, block data update,
    /// everything else cleared.
    pub const DEFAULT: Self = Self {
        values: [
            ctrl1::ENABLE_ALL_AXES | ctrl1::PM_NORMAL,
            0,
            0,
            ctrl4::BDU,
            0,
            0,
        ],
    };

    /// Returns the cached value of `slot`.
    pub const fn get(&self, slot: Slot) -> u8 {
        self.values[slot.index()]
    }

    /// Iterates slots and values in write order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, u8)> + '_ {
        Slot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }

    pub(crate) fn merge(&mut self, slot: Slot, mask: u8, bits: u8) {
        let entry = &mut self.values[slot.index()];
        *entry = mask_merge(*entry, mask, bits);
    }

    pub(crate) fn set(&mut self, slot: Slot, value: u8) {
        self.values[slot.index()] = value;
    }
}

impl Default for ResumeState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-chip sensitivity table, in micro-dps per LSB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConstants {
    udps_per_lsb: [i32; 3],
}

impl CalibrationConstants {
    /// LSM330 datasheet sensitivities.
    pub const LSM330: Self = Self {
        udps_per_lsb: [
            gyro_udps_per_lsb(GyroRange::Dps250),
            gyro_udps_per_lsb(GyroRange::Dps500),
            gyro_udps_per_lsb(GyroRange::Dps2000),
        ],
    };

    /// Creates a table from per-range sensitivities (250, 500, 2000 dps).
    pub const fn new(dps250: i32, dps500: i32, dps2000: i32) -> Self {
        Self {
            udps_per_lsb: [dps250, dps500, dps2000],
        }
    }

    /// Returns the sensitivity for `range` in micro-dps per LSB.
    pub const fn sensitivity(&self, range: GyroRange) -> i32 {
        match range {
            GyroRange::Dps250 => self.udps_per_lsb[0],
            GyroRange::Dps500 => self.udps_per_lsb[1],
            GyroRange::Dps2000 => self.udps_per_lsb[2],
        }
    }

    /// Milli-dps per LSB for `range` as a ratio.
    pub const fn mdps_per_lsb(&self, range: GyroRange) -> ScaleFactor {
        ScaleFactor::new(self.sensitivity(range), 1000)
    }
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        Self::LSM330
    }
}

/// Owns the constants and the resume state of one device.
pub(crate) struct CalibrationStore {
    constants: CalibrationConstants,
    resume: ResumeState,
}

impl CalibrationStore {
    pub(crate) const fn new(constants: CalibrationConstants, resume: ResumeState) -> Self {
        Self { constants, resume }
    }

    pub(crate) const fn constants(&self) -> &CalibrationConstants {
        &self.constants
    }

    pub(crate) const fn resume(&self) -> &ResumeState {
        &self.resume
    }

    /// Read-modify-write of one slot.
    ///
    /// The cache is merged only after both bus phases succeed.
    pub(crate) async fn update_register<T: RegisterTransport>(
        &mut self,
        transport: &mut T,
        layout: RegisterLayout,
        slot: Slot,
        mask: u8,
        bits: u8,
    ) -> Result<u8, Error> {
        let addr = layout.slot_addr(slot);
        let current = transport.read_reg(addr).await?;
        let value = mask_merge(current, mask, bits);
        transport.write_reg(addr, value).await?;
        self.resume.merge(slot, mask, bits);
        log_trace!("slot {:?}: {:#x} -> {:#x}", slot, current, value);
        Ok(value)
    }

    /// Whole-register write of one slot; the cache is set after the write lands.
    pub(crate) async fn write_register<T: RegisterTransport>(
        &mut self,
        transport: &mut T,
        layout: RegisterLayout,
        slot: Slot,
        value: u8,
    ) -> Result<(), Error> {
        transport.write_reg(layout.slot_addr(slot), value).await?;
        self.resume.set(slot, value);
        Ok(())
    }

    /// Records a masked change without touching the bus.
    pub(crate) fn stage(&mut self, slot: Slot, mask: u8, bits: u8) {
        self.resume.merge(slot, mask, bits);
    }

    /// Writes every tracked slot in order.
    ///
    /// The contiguous control block goes out as one burst, followed by the
    /// FIFO control register.
    pub(crate) async fn apply_full_resume_state<T: RegisterTransport>(
        &self,
        transport: &mut T,
        layout: RegisterLayout,
    ) -> Result<(), Error> {
        let mut block = [0u8; Slot::COUNT - 1];
        for (value, slot) in block.iter_mut().zip(Slot::ALL) {
            *value = self.resume.get(slot);
        }
        transport
            .write_regs(layout.slot_addr(Slot::ModeControl), &block)
            .await?;
        transport
            .write_reg(
                layout.slot_addr(Slot::FifoControl),
                self.resume.get(Slot::FifoControl),
            )
            .await
    }
}
