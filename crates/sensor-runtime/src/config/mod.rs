//! Gyroscope configuration.

pub(crate) mod common;
pub(crate) mod mode;
pub(crate) mod rate;

pub use common::{AxisMap, AxisNegate, GyroRange};
pub use mode::PowerState;
pub(crate) use mode::PowerStateMachine;
pub use rate::{LSM330_RATES, OutputRate, OutputRatePolicy};

use crate::calibration::CalibrationConstants;
use crate::data::FifoMode;
use crate::error::Error;
use crate::register::RegisterLayout;

/// Lowest polling interval accepted regardless of configuration.
pub const MIN_INTERVAL_FLOOR_MS: u32 = 2;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Gyroscope runtime configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Logical-to-physical axis mapping.
    pub axis_map: AxisMap,
    /// Per-axis sign inversion.
    pub negate: AxisNegate,
    /// Full-scale range.
    pub range: GyroRange,
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u32,
    /// Shortest polling interval callers may request.
    pub min_interval_ms: u32,
    /// FIFO watermark (samples).
    pub watermark: u8,
    /// FIFO mode.
    pub fifo_mode: FifoMode,
}

impl Config {
    /// Default configuration: identity axes, 250 dps, 100 ms polling, bypass FIFO.
    pub const DEFAULT: Self = Self {
        axis_map: AxisMap::IDENTITY,
        negate: AxisNegate::NONE,
        range: GyroRange::Dps250,
        poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        min_interval_ms: MIN_INTERVAL_FLOOR_MS,
        watermark: 0,
        fifo_mode: FifoMode::Bypass,
    };

    /// Creates a default configuration.
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the axis mapping.
    #[must_use]
    pub const fn with_axis_map(mut self, axis_map: AxisMap) -> Self {
        self.axis_map = axis_map;
        self
    }

    /// Sets the per-axis sign inversion.
    #[must_use]
    pub const fn with_negate(mut self, negate: AxisNegate) -> Self {
        self.negate = negate;
        self
    }

    /// Sets the full-scale range.
    #[must_use]
    pub const fn with_range(mut self, range: GyroRange) -> Self {
        self.range = range;
        self
    }

    /// Sets the polling interval.
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Sets the shortest polling interval callers may request.
    #[must_use]
    pub const fn with_min_interval_ms(mut self, interval_ms: u32) -> Self {
        self.min_interval_ms = interval_ms;
        self
    }

    /// Sets the FIFO watermark.
    #[must_use]
    pub const fn with_watermark(mut self, watermark: u8) -> Self {
        self.watermark = watermark;
        self
    }

    /// Sets the FIFO mode.
    #[must_use]
    pub const fn with_fifo_mode(mut self, mode: FifoMode) -> Self {
        self.fifo_mode = mode;
        self
    }

    /// Validates the configuration and returns its normalized form.
    ///
    /// The minimum interval is raised to [`MIN_INTERVAL_FLOOR_MS`] and the
    /// polling interval to the minimum interval. An axis channel above 2 is
    /// rejected.
    pub fn validate(self) -> Result<Self, Error> {
        let [x, y, z] = self.axis_map.channels();
        let axis_map = AxisMap::new(x, y, z)?;
        let min_interval_ms = self.min_interval_ms.max(MIN_INTERVAL_FLOOR_MS);
        Ok(Self {
            axis_map,
            min_interval_ms,
            poll_interval_ms: self.poll_interval_ms.max(min_interval_ms),
            ..self
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that differs between register-compatible gyroscope parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipProfile {
    /// Register addresses and identity value.
    pub layout: RegisterLayout,
    /// Output data rate table.
    pub rates: OutputRatePolicy,
    /// Sensitivity per full-scale range.
    pub constants: CalibrationConstants,
}

impl ChipProfile {
    /// LSM330 gyroscope die.
    pub const LSM330: Self = Self {
        layout: RegisterLayout::LSM330,
        rates: OutputRatePolicy::LSM330,
        constants: CalibrationConstants::LSM330,
    };

    /// Replaces the register layout.
    #[must_use]
    pub const fn with_layout(mut self, layout: RegisterLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the rate table.
    #[must_use]
    pub const fn with_rates(mut self, rates: OutputRatePolicy) -> Self {
        self.rates = rates;
        self
    }

    /// Replaces the sensitivity table.
    #[must_use]
    pub const fn with_constants(mut self, constants: CalibrationConstants) -> Self {
        self.constants = constants;
        self
    }
}

impl Default for ChipProfile {
    fn default() -> Self {
        Self::LSM330
    }
}
