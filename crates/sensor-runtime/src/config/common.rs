//! Axis mapping and full-scale range types.

use crate::error::Error;
use crate::register::ctrl4;

/// Logical-to-physical axis mapping.
///
/// Each field names the hardware channel (0, 1 or 2) that feeds the
/// corresponding reported axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMap {
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) z: u8,
}

impl AxisMap {
    /// Hardware order: X from channel 0, Y from 1, Z from 2.
    pub const IDENTITY: Self = Self { x: 0, y: 1, z: 2 };

    /// Creates a mapping, rejecting channel indices above 2.
    pub const fn new(x: u8, y: u8, z: u8) -> Result<Self, Error> {
        if x > 2 || y > 2 || z > 2 {
            return Err(Error::Validation);
        }
        Ok(Self { x, y, z })
    }

    /// Returns the hardware channels feeding X, Y and Z.
    pub const fn channels(self) -> [u8; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-axis sign inversion applied after remapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisNegate {
    /// Invert the reported X axis.
    pub x: bool,
    /// Invert the reported Y axis.
    pub y: bool,
    /// Invert the reported Z axis.
    pub z: bool,
}

impl AxisNegate {
    /// No inversion.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        z: false,
    };

    /// Creates negation flags.
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// Builds flags from raw 0/1 values, rejecting anything else.
    pub const fn from_flags(x: u8, y: u8, z: u8) -> Result<Self, Error> {
        if x > 1 || y > 1 || z > 1 {
            return Err(Error::Validation);
        }
        Ok(Self {
            x: x == 1,
            y: y == 1,
            z: z == 1,
        })
    }
}

/// Gyroscope full-scale range selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// +/-250 deg/s.
    #[default]
    Dps250,
    /// +/-500 deg/s.
    Dps500,
    /// +/-2000 deg/s.
    Dps2000,
}

impl GyroRange {
    /// Returns the full-scale range in degrees per second.
    pub const fn dps(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps2000 => 2000,
        }
    }

    /// Parses a range given in degrees per second.
    pub const fn from_dps(dps: u16) -> Result<Self, Error> {
        match dps {
            250 => Ok(Self::Dps250),
            500 => Ok(Self::Dps500),
            2000 => Ok(Self::Dps2000),
            _ => Err(Error::Validation),
        }
    }

    /// Returns the CTRL4 full-scale bits.
    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::Dps250 => ctrl4::FS_250,
            Self::Dps500 => ctrl4::FS_500,
            Self::Dps2000 => ctrl4::FS_2000,
        }
    }
}
