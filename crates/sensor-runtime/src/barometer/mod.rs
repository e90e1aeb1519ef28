//! Temperature-compensated barometric pressure sensor (BMP085/BMP180 family).
//!
//! Temperature and pressure share one conversion register, so both
//! measurements run under the same lock. Pressure readings reuse the last
//! temperature correction until it is older than the configured period.

mod calibration;

pub use calibration::{BarometerCalibration, CALIBRATION_LEN};

use calibration::temperature_from_b5;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;

use crate::error::Error;
use crate::interface::RegisterTransport;
use crate::logging::{log_debug, log_info, log_warn};
use crate::power::PowerHook;

/// Expected chip identifier.
pub const BAROMETER_CHIP_ID: u8 = 0x55;
/// Highest oversampling setting; larger requests are clamped.
pub const MAX_OVERSAMPLING: u8 = 3;
/// Default temperature refresh period.
pub const DEFAULT_TEMPERATURE_PERIOD_MS: u32 = 1000;

const REG_CALIBRATION: u8 = 0xAA;
const REG_CHIP_ID: u8 = 0xD0;
const REG_CTRL: u8 = 0xF4;
const REG_CONVERSION: u8 = 0xF6;

const CMD_TEMPERATURE: u8 = 0x2E;
const CMD_PRESSURE: u8 = 0x34;
const TEMPERATURE_CONVERSION_MS: u32 = 5;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Barometer settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarometerConfig {
    /// Oversampling setting, 0..=3.
    pub oversampling: u8,
    /// Maximum age of the temperature correction used for pressure.
    pub temperature_period_ms: u32,
    /// Identifier expected at the chip-id register.
    pub chip_id: u8,
}

impl BarometerConfig {
    /// Highest oversampling, one-second temperature refresh.
    pub const DEFAULT: Self = Self {
        oversampling: MAX_OVERSAMPLING,
        temperature_period_ms: DEFAULT_TEMPERATURE_PERIOD_MS,
        chip_id: BAROMETER_CHIP_ID,
    };

    /// Creates a default configuration.
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the oversampling, clamped to [`MAX_OVERSAMPLING`].
    #[must_use]
    pub const fn with_oversampling(mut self, oversampling: u8) -> Self {
        self.oversampling = clamp_oversampling(oversampling);
        self
    }

    /// Sets the temperature refresh period.
    #[must_use]
    pub const fn with_temperature_period_ms(mut self, period_ms: u32) -> Self {
        self.temperature_period_ms = period_ms;
        self
    }

    /// Sets the expected chip identifier.
    #[must_use]
    pub const fn with_chip_id(mut self, chip_id: u8) -> Self {
        self.chip_id = chip_id;
        self
    }
}

impl Default for BarometerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn clamp_oversampling(oversampling: u8) -> u8 {
    if oversampling > MAX_OVERSAMPLING {
        MAX_OVERSAMPLING
    } else {
        oversampling
    }
}

/// Pressure conversion wait for an oversampling setting.
pub const fn pressure_conversion_ms(oversampling: u8) -> u32 {
    2 + (3 << clamp_oversampling(oversampling))
}

struct Conversion<T, D, P> {
    transport: T,
    delay: D,
    power: P,
    config: BarometerConfig,
    calibration: Option<BarometerCalibration>,
    last_temperature_ms: Option<u64>,
    b6: i32,
}

impl<T, D, P> Conversion<T, D, P>
where
    T: RegisterTransport,
    D: DelayNs,
{
    fn calibration(&self) -> Result<BarometerCalibration, Error> {
        self.calibration.ok_or(Error::HardwareInit)
    }

    async fn identify(&mut self) -> Result<BarometerCalibration, Error> {
        let id = self.transport.read_reg(REG_CHIP_ID).await?;
        if id != self.config.chip_id {
            log_warn!("unexpected chip id {:#x}", id);
            return Err(Error::WrongDevice);
        }
        let mut block = [0u8; CALIBRATION_LEN];
        self.transport.read_regs(REG_CALIBRATION, &mut block).await?;
        Ok(BarometerCalibration::from_bytes(&block))
    }

    async fn raw_temperature(&mut self) -> Result<u16, Error> {
        self.transport.write_reg(REG_CTRL, CMD_TEMPERATURE).await?;
        self.delay.delay_ms(TEMPERATURE_CONVERSION_MS).await;
        let mut buf = [0u8; 2];
        self.transport.read_regs(REG_CONVERSION, &mut buf).await?;
        Ok(u16::from_be_bytes(buf))
    }

    async fn raw_pressure(&mut self) -> Result<u32, Error> {
        let oss = self.config.oversampling;
        self.transport
            .write_reg(REG_CTRL, CMD_PRESSURE + (oss << 6))
            .await?;
        self.delay.delay_ms(pressure_conversion_ms(oss)).await;
        let mut buf = [0u8; 3];
        self.transport.read_regs(REG_CONVERSION, &mut buf).await?;
        let raw = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
        Ok(raw >> (8 - oss))
    }

    /// Runs a temperature conversion and refreshes the pressure correction.
    async fn update_temperature(&mut self, now_ms: u64) -> Result<i32, Error> {
        let calibration = self.calibration()?;
        let raw = self.raw_temperature().await?;
        let b5 = calibration.b5(raw)?;
        self.b6 = b5 - 4000;
        self.last_temperature_ms = Some(now_ms);
        log_debug!("raw temperature {}, b6 {}", raw, self.b6);
        Ok(temperature_from_b5(b5))
    }

    fn temperature_is_stale(&self, now_ms: u64) -> bool {
        match self.last_temperature_ms {
            None => true,
            Some(last) => {
                now_ms.saturating_sub(last) >= u64::from(self.config.temperature_period_ms)
            }
        }
    }
}

/// BMP085/BMP180 barometer driver.
pub struct Barometer<M: RawMutex, T, D, C, P = ()> {
    inner: Mutex<M, Conversion<T, D, P>>,
    clock: C,
}

impl<M, T, D, C, P> Barometer<M, T, D, C, P>
where
    M: RawMutex,
{
    /// Creates a driver. Call [`init`](Self::init) before measuring.
    pub fn new(transport: T, delay: D, clock: C, power: P, config: BarometerConfig) -> Self {
        let config = config.with_oversampling(config.oversampling);
        Self {
            inner: Mutex::new(Conversion {
                transport,
                delay,
                power,
                config,
                calibration: None,
                last_temperature_ms: None,
                b6: 0,
            }),
            clock,
        }
    }

    /// Consumes the driver and returns the transport and collaborators.
    pub fn release(self) -> (T, D, C, P) {
        let inner = self.inner.into_inner();
        (inner.transport, inner.delay, self.clock, inner.power)
    }
}

impl<M, T, D, C, P> Barometer<M, T, D, C, P>
where
    M: RawMutex,
    T: RegisterTransport,
    D: DelayNs,
    C: Clock,
    P: PowerHook,
{
    /// Powers the sensor, checks the chip id and loads calibration.
    ///
    /// Any failure after power-on powers the sensor back off.
    pub async fn init(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        inner.power.power_on().await.map_err(|_| Error::PowerOn)?;

        match inner.identify().await {
            Ok(calibration) => {
                inner.calibration = Some(calibration);
                inner.last_temperature_ms = None;
                log_info!("barometer ready, oss {}", inner.config.oversampling);
                Ok(())
            }
            Err(err) => {
                if inner.power.power_off().await.is_err() {
                    log_warn!("power-off hook failed");
                }
                Err(err)
            }
        }
    }

    /// Returns the calibration read at init.
    pub async fn calibration(&self) -> Option<BarometerCalibration> {
        self.inner.lock().await.calibration
    }

    /// Measures temperature in 0.1 °C.
    ///
    /// Every call converts and also refreshes the pressure correction.
    pub async fn get_temperature(&self) -> Result<i32, Error> {
        let mut inner = self.inner.lock().await;
        let now_ms = self.clock.now_ms();
        inner.update_temperature(now_ms).await
    }

    /// Measures pressure in Pa, refreshing the temperature correction first
    /// when it is older than the configured period.
    pub async fn get_pressure(&self) -> Result<i32, Error> {
        let mut inner = self.inner.lock().await;
        let calibration = inner.calibration()?;
        let now_ms = self.clock.now_ms();
        if inner.temperature_is_stale(now_ms) {
            inner.update_temperature(now_ms).await?;
        }
        let raw = inner.raw_pressure().await?;
        calibration.pressure(raw, inner.b6, inner.config.oversampling)
    }

    /// Returns the oversampling setting.
    pub async fn oversampling(&self) -> u8 {
        self.inner.lock().await.config.oversampling
    }

    /// Sets the oversampling, clamping values above 3. Returns the value
    /// applied.
    pub async fn set_oversampling(&self, oversampling: u8) -> u8 {
        let mut inner = self.inner.lock().await;
        inner.config = inner.config.with_oversampling(oversampling);
        inner.config.oversampling
    }

    /// Returns the temperature refresh period.
    pub async fn temperature_period_ms(&self) -> u32 {
        self.inner.lock().await.config.temperature_period_ms
    }

    /// Sets the temperature refresh period.
    pub async fn set_temperature_period_ms(&self, period_ms: u32) {
        let mut inner = self.inner.lock().await;
        inner.config.temperature_period_ms = period_ms;
    }

    /// Cuts sensor power.
    pub async fn suspend(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        inner.power.power_off().await.map_err(|_| Error::PowerOff)
    }

    /// Restores sensor power. The next pressure read refreshes temperature.
    pub async fn resume(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        inner.power.power_on().await.map_err(|_| Error::PowerOn)?;
        inner.last_temperature_ms = None;
        Ok(())
    }
}
