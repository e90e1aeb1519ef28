//! Error type for the sensor runtime.

use core::fmt;

/// Error type for sensor runtime operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Register read failed on the bus.
    TransportRead,
    /// Register write failed on the bus.
    TransportWrite,
    /// The power-on hook failed; the device stays disabled.
    PowerOn,
    /// The power-off hook failed.
    PowerOff,
    /// A caller-supplied configuration value was rejected.
    Validation,
    /// Hardware initialization failed, or a measurement ran before it.
    HardwareInit,
    /// Identity register did not match the expected part.
    WrongDevice,
    /// Calibration or sample data cannot be used.
    InvalidData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::TransportRead => "register read failed",
            Self::TransportWrite => "register write failed",
            Self::PowerOn => "power-on hook failed",
            Self::PowerOff => "power-off hook failed",
            Self::Validation => "invalid configuration value",
            Self::HardwareInit => "hardware initialization failed",
            Self::WrongDevice => "unexpected device identity",
            Self::InvalidData => "invalid calibration data",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
