//! Factory calibration block and compensation arithmetic.

use crate::error::Error;

/// Length of the calibration block in bytes.
pub const CALIBRATION_LEN: usize = 22;

/// Factory calibration coefficients, read once at init.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarometerCalibration {
    /// Pressure offset term AC1.
    pub ac1: i16,
    /// Pressure offset term AC2.
    pub ac2: i16,
    /// Pressure sensitivity term AC3.
    pub ac3: i16,
    /// Pressure sensitivity term AC4.
    pub ac4: u16,
    /// Temperature gain AC5.
    pub ac5: u16,
    /// Temperature offset AC6.
    pub ac6: u16,
    /// Second-order pressure term B1.
    pub b1: i16,
    /// Second-order pressure term B2.
    pub b2: i16,
    /// Reserved coefficient MB; unused by the compensation.
    pub mb: i16,
    /// Temperature term MC.
    pub mc: i16,
    /// Temperature term MD.
    pub md: i16,
}

impl BarometerCalibration {
    /// Decodes the big-endian calibration block starting at 0xAA.
    pub const fn from_bytes(bytes: &[u8; CALIBRATION_LEN]) -> Self {
        const fn word(bytes: &[u8; CALIBRATION_LEN], index: usize) -> u16 {
            u16::from_be_bytes([bytes[2 * index], bytes[2 * index + 1]])
        }

        Self {
            ac1: word(bytes, 0) as i16,
            ac2: word(bytes, 1) as i16,
            ac3: word(bytes, 2) as i16,
            ac4: word(bytes, 3),
            ac5: word(bytes, 4),
            ac6: word(bytes, 5),
            b1: word(bytes, 6) as i16,
            b2: word(bytes, 7) as i16,
            mb: word(bytes, 8) as i16,
            mc: word(bytes, 9) as i16,
            md: word(bytes, 10) as i16,
        }
    }

    /// Intermediate temperature term `B5` for a raw temperature reading.
    ///
    /// Signed throughout, so readings below `AC6` stay correct. Products are
    /// formed in 64 bits; an erased or floating calibration block yields a
    /// value or [`Error::InvalidData`], never an overflow.
    pub fn b5(&self, raw_temperature: u16) -> Result<i32, Error> {
        let x1 = ((i64::from(raw_temperature) - i64::from(self.ac6)) * i64::from(self.ac5)) >> 15;
        let divisor = x1 + i64::from(self.md);
        if divisor == 0 {
            return Err(Error::InvalidData);
        }
        let x2 = (i64::from(self.mc) << 11) / divisor;
        narrow(x1 + x2)
    }

    /// Temperature in 0.1 °C.
    pub fn temperature(&self, raw_temperature: u16) -> Result<i32, Error> {
        Ok(temperature_from_b5(self.b5(raw_temperature)?))
    }

    /// Pressure in Pa.
    ///
    /// `b6` is `B5 - 4000` from the last temperature conversion;
    /// `raw_pressure` is already shifted down by `8 - oversampling`.
    pub fn pressure(&self, raw_pressure: u32, b6: i32, oversampling: u8) -> Result<i32, Error> {
        let oss = u32::from(oversampling.min(super::MAX_OVERSAMPLING));
        let b6 = i64::from(b6);
        let b6_sq = (b6 * b6) >> 12;

        let x1 = (i64::from(self.b2) * b6_sq) >> 11;
        let x2 = (i64::from(self.ac2) * b6) >> 11;
        let x3 = x1 + x2;
        let b3 = (((i64::from(self.ac1) * 4 + x3) << oss) + 2) >> 2;

        let x1 = (i64::from(self.ac3) * b6) >> 13;
        let x2 = (i64::from(self.b1) * b6_sq) >> 16;
        let x3 = (x1 + x2 + 2) >> 2;
        let b4 = (i64::from(self.ac4) * (x3 + 32768)) >> 15;
        if b4 <= 0 || b4 > i64::from(u32::MAX) {
            return Err(Error::InvalidData);
        }

        let b7 = (i64::from(raw_pressure) - b3) * i64::from(50_000u32 >> oss);
        let p = if b7 < 0x8000_0000 {
            (b7 * 2) / b4
        } else {
            (b7 / b4) * 2
        };

        let x1 = (p >> 8) * (p >> 8);
        let x1 = (x1 * 3038) >> 16;
        let x2 = (-7357 * p) >> 16;
        narrow(p + ((x1 + x2 + 3791) >> 4))
    }
}

fn narrow(value: i64) -> Result<i32, Error> {
    i32::try_from(value).map_err(|_| Error::InvalidData)
}

pub(crate) const fn temperature_from_b5(b5: i32) -> i32 {
    (b5 + 8) >> 4
}
