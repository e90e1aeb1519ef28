//! I2C transport adapter.

use embedded_hal_async::i2c::{I2c, Operation};

use super::{GyroAddress, RegisterTransport};
use crate::error::Error;

/// Sub-address bit that requests auto-increment on ST-style I2C parts.
pub const I2C_AUTO_INCREMENT: u8 = 0x80;

/// I2C transport configuration (address + sub-address handling).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    pub(crate) address: u8,
    pub(crate) auto_increment: bool,
}

impl I2cConfig {
    /// Creates a new I2C configuration for the provided address.
    ///
    /// Auto-increment is on; multi-byte transfers set bit 7 of the
    /// register sub-address.
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            auto_increment: true,
        }
    }

    /// Sets the I2C address.
    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Enables or disables the auto-increment sub-address bit.
    ///
    /// Parts that always auto-increment (such as BMP18x barometers) need
    /// this off.
    #[must_use]
    pub const fn with_auto_increment(mut self, enable: bool) -> Self {
        self.auto_increment = enable;
        self
    }

    /// Returns the configured 7-bit address.
    pub const fn address(self) -> u8 {
        self.address
    }
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::new(GyroAddress::Primary.addr())
    }
}

/// I2C register transport.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    config: I2cConfig,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new I2C transport with the given bus and configuration.
    pub const fn new(i2c: I2C, config: I2cConfig) -> Self {
        Self { i2c, config }
    }

    /// Changes the 7-bit I2C address.
    pub fn set_address(&mut self, address: u8) {
        self.config.address = address;
    }

    /// Releases the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    const fn sub_address(&self, reg: u8, len: usize) -> u8 {
        if self.config.auto_increment && len > 1 {
            reg | I2C_AUTO_INCREMENT
        } else {
            reg
        }
    }
}

impl<I2C> RegisterTransport for I2cInterface<I2C>
where
    I2C: I2c,
{
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error> {
        if buffer.is_empty() {
            return Ok(());
        }
        let sub = self.sub_address(reg, buffer.len());
        self.i2c
            .write_read(self.config.address, &[sub], buffer)
            .await
            .map_err(|_| Error::TransportRead)
    }

    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }
        let sub = [self.sub_address(reg, data.len())];
        let mut ops = [Operation::Write(&sub), Operation::Write(data)];
        self.i2c
            .transaction(self.config.address, &mut ops)
            .await
            .map_err(|_| Error::TransportWrite)
    }
}
