//! I2C addresses of the gyroscope die.
//!
//! On the LSM330 the gyroscope answers on its own address pair, selected by
//! the `SDO_G` pin, while the accelerometer die sits at 0x18/0x19 on the same
//! bus. Standalone L3G-family parts use the same pair.

/// Gyroscope I2C address, selected by the level of `SDO_G`/`SA0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroAddress {
    /// 0x6A, `SDO_G` tied low.
    Primary,
    /// 0x6B, `SDO_G` tied high.
    Secondary,
}

impl GyroAddress {
    /// Picks the address from the strap level of `SDO_G`.
    pub const fn from_sdo(high: bool) -> Self {
        if high { Self::Secondary } else { Self::Primary }
    }

    /// Returns the 7-bit I2C address.
    pub const fn addr(self) -> u8 {
        match self {
            Self::Primary => 0x6A,
            Self::Secondary => 0x6B,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdo_strap_selects_address() {
        assert_eq!(GyroAddress::from_sdo(false).addr(), 0x6A);
        assert_eq!(GyroAddress::from_sdo(true).addr(), 0x6B);
    }
}
