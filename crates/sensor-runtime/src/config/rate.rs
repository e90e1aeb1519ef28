//! Output data rate selection from a requested polling interval.

use crate::register::ctrl1;

/// One supported output data rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputRate {
    /// Shortest polling interval this rate serves, in milliseconds.
    pub interval_ms: u32,
    /// CTRL1 output data rate and bandwidth bits.
    pub bits: u8,
}

impl OutputRate {
    /// Creates a rate table entry.
    pub const fn new(interval_ms: u32, bits: u8) -> Self {
        Self { interval_ms, bits }
    }
}

/// Rate table of the LSM330 gyroscope, fastest first.
pub const LSM330_RATES: [OutputRate; 4] = [
    OutputRate::new(2, ctrl1::ODR_760 | ctrl1::BW_10),
    OutputRate::new(3, ctrl1::ODR_380 | ctrl1::BW_01),
    OutputRate::new(6, ctrl1::ODR_190 | ctrl1::BW_00),
    OutputRate::new(11, ctrl1::ODR_95 | ctrl1::BW_00),
];

/// Maps polling intervals onto a hardware rate table.
///
/// The table must be ordered from the shortest interval to the longest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputRatePolicy {
    table: &'static [OutputRate],
}

impl OutputRatePolicy {
    /// Policy for the LSM330 rate table.
    pub const LSM330: Self = Self::new(&LSM330_RATES);

    /// Creates a policy over `table`.
    ///
    /// # Panics
    ///
    /// Panics if `table` is empty.
    pub const fn new(table: &'static [OutputRate]) -> Self {
        assert!(!table.is_empty(), "rate table must not be empty");
        Self { table }
    }

    /// Returns the rate table.
    pub const fn table(&self) -> &'static [OutputRate] {
        self.table
    }

    /// Shortest interval any entry serves.
    pub const fn fastest_interval_ms(&self) -> u32 {
        self.table[0].interval_ms
    }

    /// Selects the entry with the largest interval not above `interval_ms`.
    ///
    /// Requests shorter than every entry fall back to the slowest entry.
    pub fn select(&self, interval_ms: u32) -> OutputRate {
        self.table
            .iter()
            .rev()
            .find(|entry| entry.interval_ms <= interval_ms)
            .copied()
            .unwrap_or(self.table[self.table.len() - 1])
    }

    /// Builds the full CTRL1 value for `interval_ms` with every axis on in
    /// normal power mode.
    pub(crate) fn mode_control_value(&self, interval_ms: u32) -> u8 {
        self.select(interval_ms).bits | ctrl1::ENABLE_ALL_AXES | ctrl1::PM_NORMAL
    }
}

impl Default for OutputRatePolicy {
    fn default() -> Self {
        Self::LSM330
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_picks_largest_interval_not_above_request() {
        let policy = OutputRatePolicy::LSM330;
        for requested in 2..200u32 {
            let chosen = policy.select(requested);
            assert!(chosen.interval_ms <= requested);
            let better = policy
                .table()
                .iter()
                .filter(|entry| entry.interval_ms <= requested)
                .map(|entry| entry.interval_ms)
                .max();
            assert_eq!(Some(chosen.interval_ms), better);
        }
    }

    #[test]
    fn select_is_monotonic_as_request_shrinks() {
        let policy = OutputRatePolicy::LSM330;
        let mut previous = u32::MAX;
        for requested in (2..64u32).rev() {
            let chosen = policy.select(requested).interval_ms;
            assert!(chosen <= previous);
            previous = chosen;
        }
    }

    #[test]
    fn six_ms_selects_190hz() {
        let policy = OutputRatePolicy::LSM330;
        assert_eq!(policy.select(6).bits, ctrl1::ODR_190 | ctrl1::BW_00);
        assert_eq!(policy.mode_control_value(6), 0x4F);
        assert_eq!(policy.select(5).bits, ctrl1::ODR_380 | ctrl1::BW_01);
        assert_eq!(policy.select(100).bits, ctrl1::ODR_95 | ctrl1::BW_00);
    }

    #[test]
    fn too_short_request_falls_back_to_slowest() {
        let policy = OutputRatePolicy::LSM330;
        assert_eq!(policy.select(1).interval_ms, 11);
    }
}
