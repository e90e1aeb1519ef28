//! Async `#![no_std]` runtime for FIFO gyroscopes (LSM330 / L3G4200D
//! family) and temperature-compensated barometers (BMP085 / BMP180).
//!
//! The gyroscope driver keeps a cached copy of every configuration register
//! (the resume state) so the part can be reprogrammed in one burst after a
//! power cycle. Samples are pushed to an [`EventSink`] either by the poll
//! task or by the interrupt task draining the hardware FIFO.
//!
//! # Quick start (I2C)
//!
//! ```rust,no_run
//! use embassy_sync::blocking_mutex::raw::RawMutex;
//! use ph_sensor_runtime::{Config, GyroAddress, GyroscopeI2c, I2cConfig, Sample};
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! #
//! # async fn example<M: RawMutex, I2C: I2c, D: DelayNs>(i2c: I2C, mut delay: D) -> Result<(), ph_sensor_runtime::Error> {
//! let config = Config::new().with_poll_interval_ms(6);
//! let i2c_config = I2cConfig::new(GyroAddress::Primary.addr());
//! let report = |sample: Sample| {
//!     let _ = sample.to_mdps(config.range);
//! };
//! let gyro: GyroscopeI2c<M, I2C, _> =
//!     GyroscopeI2c::new_i2c(i2c, i2c_config, report, (), (), config)?;
//! gyro.probe().await?;
//! gyro.enable().await?;
//! gyro.poll_until_disabled(&mut delay).await;
//! # Ok(())
//! # }
//! ```
//!
//! On hardware pick `CriticalSectionRawMutex` for `M` and spawn
//! [`Gyroscope::run_poller`] and [`Gyroscope::service_interrupts`] as
//! separate tasks sharing the driver by reference.
//!
//! # FIFO
//!
//! In [`FifoMode::Fifo`] the interrupt line is routed to watermark and
//! overrun events; each interrupt drains `watermark + 1` samples and then
//! restarts collection through `Bypass`. In [`FifoMode::Bypass`] each
//! data-ready interrupt reports one sample.
//!
//! # Logging
//!
//! Enable `defmt` or `log` to get driver logs; with neither feature the
//! logging calls compile away.
//!
//! # Fixed-point conversions
//!
//! Enable the `fixed` feature to convert samples into dps using `I32F32`
//! integer math.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

#[cfg(feature = "fixed")]
extern crate fixed as fixed_crate;

mod logging;

mod barometer;
mod calibration;
mod config;
mod data;
mod device;
mod driver;
mod error;
mod interface;
mod interrupt;
mod power;
pub mod register;
mod sink;

#[cfg(test)]
mod testing;

// Interface layer
pub use interface::{GyroAddress, RegisterTransport};
pub use interface::{I2C_AUTO_INCREMENT, I2cConfig, I2cInterface};
pub use interface::{SpiConfig, SpiInterface};
pub use register::{RegisterLayout, Slot};

// Configuration
pub use calibration::{CalibrationConstants, ResumeState, mask_merge};
pub use config::{AxisMap, AxisNegate, ChipProfile, Config, GyroRange, PowerState};
pub use config::{DEFAULT_POLL_INTERVAL_MS, MIN_INTERVAL_FLOOR_MS};
pub use config::{LSM330_RATES, OutputRate, OutputRatePolicy};

// Drivers
pub use barometer::{Barometer, BarometerCalibration, BarometerConfig, Clock};
pub use barometer::{
    BAROMETER_CHIP_ID, CALIBRATION_LEN, DEFAULT_TEMPERATURE_PERIOD_MS, MAX_OVERSAMPLING,
    pressure_conversion_ms,
};
pub use driver::{Gyroscope, GyroscopeI2c, GyroscopeSpi};

// Data types
pub use data::{
    FifoMode,
    FifoStatus,
    SAMPLE_BLOCK_LEN,
    Sample,
    ScaleFactor,
    gyro_mdps_per_lsb,
    gyro_udps_per_lsb,
    watermark_bits,
};

// Collaborators
pub use error::Error;
pub use interrupt::{InterruptRouting, InterruptSource};
pub use power::PowerHook;
pub use sink::EventSink;

// Fixed-point conversions (feature-gated)
#[cfg(feature = "fixed")]
pub use data::fixed::{Fixed, GyroFixed, gyro_to_dps};
