//! Fixed-point conversion helpers.

use super::Sample;
use super::scale::gyro_udps_per_lsb;
use crate::config::GyroRange;

/// Fixed-point number type used for sensor conversions (I32F32).
pub type Fixed = crate::fixed_crate::types::I32F32;

/// Fixed-point gyroscope sample in dps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GyroFixed {
    /// X-axis angular rate in dps.
    pub x: Fixed,
    /// Y-axis angular rate in dps.
    pub y: Fixed,
    /// Z-axis angular rate in dps.
    pub z: Fixed,
}

/// Converts a sample to degrees per second.
pub fn gyro_to_dps(sample: Sample, range: GyroRange) -> GyroFixed {
    let scale = Fixed::from_num(gyro_udps_per_lsb(range)) / Fixed::from_num(1_000_000);
    GyroFixed {
        x: Fixed::from_num(sample.x) * scale,
        y: Fixed::from_num(sample.y) * scale,
        z: Fixed::from_num(sample.z) * scale,
    }
}
