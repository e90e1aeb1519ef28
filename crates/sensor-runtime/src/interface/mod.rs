//! Register transport abstraction.
//!
//! The runtime only needs addressed reads and writes of a device register
//! space. [`I2cInterface`] and [`SpiInterface`] adapt `embedded-hal-async`
//! buses; anything else (a shared-bus proxy, a simulator) can implement
//! [`RegisterTransport`] directly.

pub(crate) mod address;
pub(crate) mod i2c;
pub(crate) mod spi;

pub use address::GyroAddress;
pub use i2c::{I2C_AUTO_INCREMENT, I2cConfig, I2cInterface};
pub use spi::{SpiConfig, SpiInterface};

use crate::error::Error;

/// Async register I/O consumed by the device cores.
///
/// Multi-byte transfers address consecutive registers; setting whatever
/// auto-increment flag the part needs is the transport's job.
#[allow(async_fn_in_trait)]
pub trait RegisterTransport {
    /// Reads a contiguous block of registers into `buffer`.
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error>;

    /// Writes a contiguous block of registers from `data`.
    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error>;

    /// Reads a single register.
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error> {
        let mut buffer = [0u8];
        self.read_regs(reg, &mut buffer).await?;
        Ok(buffer[0])
    }

    /// Writes a single register.
    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.write_regs(reg, &[value]).await
    }
}
