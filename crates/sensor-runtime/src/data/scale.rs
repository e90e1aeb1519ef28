//! Integer scaling helpers for raw gyroscope data.

use crate::config::GyroRange;

/// Ratio representing a scale factor without floating-point math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleFactor {
    /// Scale numerator.
    pub numerator: i32,
    /// Scale denominator.
    pub denominator: i32,
}

impl ScaleFactor {
    /// Creates a new scale ratio.
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Applies the ratio to a raw count, rounding toward zero.
    pub const fn apply(self, raw: i16) -> i32 {
        ((raw as i64 * self.numerator as i64) / self.denominator as i64) as i32
    }
}

/// Returns the datasheet gyroscope sensitivity in micro-dps per LSB.
pub const fn gyro_udps_per_lsb(range: GyroRange) -> i32 {
    match range {
        GyroRange::Dps250 => 8_750,
        GyroRange::Dps500 => 17_500,
        GyroRange::Dps2000 => 70_000,
    }
}

/// Returns the gyroscope scale in milli-dps per LSB as a ratio.
pub const fn gyro_mdps_per_lsb(range: GyroRange) -> ScaleFactor {
    ScaleFactor::new(gyro_udps_per_lsb(range), 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gyro_sensitivity_values() {
        assert_eq!(gyro_udps_per_lsb(GyroRange::Dps250), 8_750);
        assert_eq!(gyro_udps_per_lsb(GyroRange::Dps2000), 70_000);
    }

    #[test]
    fn mdps_ratio_scales_full_count() {
        let scale = gyro_mdps_per_lsb(GyroRange::Dps500);
        assert_eq!(scale.apply(1000), 17_500);
        assert_eq!(scale.apply(-3), -52);
    }
}
