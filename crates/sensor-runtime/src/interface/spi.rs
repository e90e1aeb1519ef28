//! SPI transport adapter.
//!
//! The first byte of every transfer is the register address, with bit 7 set
//! for reads and bit 6 set when more than one register is addressed.

use embedded_hal_async::spi::{Operation, SpiDevice};

use super::RegisterTransport;
use crate::error::Error;

const SPI_READ: u8 = 0x80;
const SPI_MULTI: u8 = 0x40;
const SPI_ADDR_MASK: u8 = 0x3F;

/// SPI transport configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    pub(crate) auto_increment: bool,
}

impl SpiConfig {
    /// Creates a new SPI configuration (auto-increment on burst transfers).
    pub const fn new() -> Self {
        Self {
            auto_increment: true,
        }
    }

    /// Enables or disables the multi-byte address bit.
    #[must_use]
    pub const fn with_auto_increment(mut self, enable: bool) -> Self {
        self.auto_increment = enable;
        self
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// SPI register transport.
pub struct SpiInterface<SPI> {
    spi: SPI,
    config: SpiConfig,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new SPI transport with the given device and configuration.
    pub const fn new(spi: SPI, config: SpiConfig) -> Self {
        Self { spi, config }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }

    const fn command(&self, reg: u8, len: usize, read: bool) -> u8 {
        let mut cmd = reg & SPI_ADDR_MASK;
        if read {
            cmd |= SPI_READ;
        }
        if self.config.auto_increment && len > 1 {
            cmd |= SPI_MULTI;
        }
        cmd
    }
}

impl<SPI> RegisterTransport for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error> {
        if buffer.is_empty() {
            return Ok(());
        }
        let cmd = [self.command(reg, buffer.len(), true)];
        let mut ops = [Operation::Write(&cmd), Operation::Read(buffer)];
        self.spi
            .transaction(&mut ops)
            .await
            .map_err(|_| Error::TransportRead)
    }

    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }
        let cmd = [self.command(reg, data.len(), false)];
        let mut ops = [Operation::Write(&cmd), Operation::Write(data)];
        self.spi
            .transaction(&mut ops)
            .await
            .map_err(|_| Error::TransportWrite)
    }
}
