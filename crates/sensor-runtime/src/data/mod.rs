//! Sample types and acquisition.

pub(crate) mod fifo;
#[cfg(feature = "fixed")]
pub(crate) mod fixed;
pub(crate) mod scale;

pub use fifo::{FifoMode, FifoStatus, watermark_bits};
pub use scale::{ScaleFactor, gyro_mdps_per_lsb, gyro_udps_per_lsb};

use crate::config::{AxisMap, AxisNegate, GyroRange};
use crate::error::Error;
use crate::interface::RegisterTransport;

/// Size of the X/Y/Z output block in bytes.
pub const SAMPLE_BLOCK_LEN: usize = 6;

/// Axis-mapped angular rate sample in raw counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// X-axis raw count.
    pub x: i16,
    /// Y-axis raw count.
    pub y: i16,
    /// Z-axis raw count.
    pub z: i16,
}

impl Sample {
    /// Creates a sample.
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Builds a sample from hardware channels, remapped and sign-corrected.
    ///
    /// Negating `i16::MIN` saturates to `i16::MAX`.
    pub const fn remap(raw: [i16; 3], map: AxisMap, negate: AxisNegate) -> Self {
        let [cx, cy, cz] = map.channels();
        Self {
            x: signed(raw[cx as usize], negate.x),
            y: signed(raw[cy as usize], negate.y),
            z: signed(raw[cz as usize], negate.z),
        }
    }

    /// Converts to milli-degrees per second using the datasheet sensitivity
    /// for `range`.
    ///
    /// Parts with their own [`CalibrationConstants`](crate::CalibrationConstants)
    /// should use [`Sample::scaled`] with
    /// [`CalibrationConstants::mdps_per_lsb`](crate::CalibrationConstants::mdps_per_lsb).
    pub const fn to_mdps(self, range: GyroRange) -> [i32; 3] {
        self.scaled(gyro_mdps_per_lsb(range))
    }

    /// Applies `scale` to every axis.
    pub const fn scaled(self, scale: ScaleFactor) -> [i32; 3] {
        [scale.apply(self.x), scale.apply(self.y), scale.apply(self.z)]
    }
}

const fn signed(value: i16, negate: bool) -> i16 {
    if negate { value.saturating_neg() } else { value }
}

/// Decodes the little-endian X/Y/Z output block in hardware channel order.
pub(crate) const fn decode_channels(bytes: [u8; SAMPLE_BLOCK_LEN]) -> [i16; 3] {
    [
        i16::from_le_bytes([bytes[0], bytes[1]]),
        i16::from_le_bytes([bytes[2], bytes[3]]),
        i16::from_le_bytes([bytes[4], bytes[5]]),
    ]
}

/// Reads output blocks and turns them into reported samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SamplingEngine {
    data_addr: u8,
    axis_map: AxisMap,
    negate: AxisNegate,
}

impl SamplingEngine {
    pub(crate) const fn new(data_addr: u8, axis_map: AxisMap, negate: AxisNegate) -> Self {
        Self {
            data_addr,
            axis_map,
            negate,
        }
    }

    /// Reads one output block and returns the remapped sample.
    pub(crate) async fn acquire<T: RegisterTransport>(
        &self,
        transport: &mut T,
    ) -> Result<Sample, Error> {
        let mut block = [0u8; SAMPLE_BLOCK_LEN];
        transport.read_regs(self.data_addr, &mut block).await?;
        Ok(Sample::remap(
            decode_channels(block),
            self.axis_map,
            self.negate,
        ))
    }
}
