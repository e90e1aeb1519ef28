//! Device core operations for one gyroscope.
//!
//! `DeviceCore` does no locking of its own; the driver serializes every call
//! behind the device mutex.

use crate::calibration::{CalibrationStore, ResumeState, mask_merge};
use crate::config::{ChipProfile, Config, GyroRange, OutputRatePolicy};
use crate::data::{FifoMode, FifoStatus, Sample, SamplingEngine, watermark_bits};
use crate::error::Error;
use crate::interface::RegisterTransport;
use crate::interrupt::InterruptRouting;
use crate::logging::{log_debug, log_trace, log_warn};
use crate::register::{RegisterLayout, Slot, ctrl1, ctrl3, ctrl4, ctrl5, fifo_ctrl};
use crate::sink::EventSink;

pub(crate) struct DeviceCore<T> {
    transport: T,
    layout: RegisterLayout,
    rates: OutputRatePolicy,
    store: CalibrationStore,
    sampler: SamplingEngine,
    config: Config,
    hw_initialized: bool,
    suspended: bool,
}

impl<T> DeviceCore<T> {
    pub(crate) fn new(transport: T, profile: ChipProfile, config: Config) -> Result<Self, Error> {
        let config = config.validate()?;
        let config = Config {
            watermark: watermark_bits(config.watermark),
            ..config
        };

        let mut resume = ResumeState::DEFAULT;
        resume.set(
            Slot::ModeControl,
            profile.rates.mode_control_value(config.poll_interval_ms),
        );
        resume.merge(Slot::Range, ctrl4::FS_MASK, config.range.bits());
        resume.merge(Slot::FifoControl, fifo_ctrl::MODE_MASK, config.fifo_mode.bits());
        resume.merge(Slot::FifoControl, fifo_ctrl::WTM_MASK, config.watermark);
        // A polled device keeps the line quiet; only FIFO mode is armed up front.
        if config.fifo_mode == FifoMode::Fifo {
            resume.merge(
                Slot::InterruptSelect,
                ctrl3::I2_MASK,
                InterruptRouting::FIFO.bits(),
            );
        }
        if let Some(on) = config.fifo_mode.accumulation() {
            resume.merge(Slot::FifoEnable, ctrl5::FIFO_EN, fifo_en_bits(on));
        }

        Ok(Self {
            transport,
            layout: profile.layout,
            rates: profile.rates,
            store: CalibrationStore::new(profile.constants, resume),
            sampler: SamplingEngine::new(
                profile.layout.data_addr(),
                config.axis_map,
                config.negate,
            ),
            config,
            hw_initialized: false,
            suspended: false,
        })
    }

    pub(crate) const fn config(&self) -> Config {
        self.config
    }

    pub(crate) const fn poll_interval_ms(&self) -> u32 {
        self.config.poll_interval_ms
    }

    pub(crate) const fn range(&self) -> GyroRange {
        self.config.range
    }

    pub(crate) const fn watermark(&self) -> u8 {
        self.config.watermark
    }

    pub(crate) const fn fifo_mode(&self) -> FifoMode {
        self.config.fifo_mode
    }

    pub(crate) const fn sensitivity(&self) -> i32 {
        self.store.constants().sensitivity(self.config.range)
    }

    pub(crate) const fn resume_state(&self) -> ResumeState {
        *self.store.resume()
    }

    pub(crate) const fn routing(&self) -> InterruptRouting {
        InterruptRouting::from_bits(self.store.resume().get(Slot::InterruptSelect))
    }

    pub(crate) const fn hw_initialized(&self) -> bool {
        self.hw_initialized
    }

    pub(crate) fn set_hw_initialized(&mut self, initialized: bool) {
        self.hw_initialized = initialized;
        if !initialized {
            self.suspended = false;
        }
    }

    pub(crate) const fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub(crate) fn release(self) -> T {
        self.transport
    }
}

impl<T> DeviceCore<T>
where
    T: RegisterTransport,
{
    pub(crate) async fn verify_device(&mut self) -> Result<(), Error> {
        let id = self.transport.read_reg(self.layout.who_am_i_addr()).await?;
        if id != self.layout.expected_id() {
            log_warn!("unexpected WHO_AM_I {:#x}", id);
            return Err(Error::WrongDevice);
        }
        Ok(())
    }

    pub(crate) async fn apply_full_resume_state(&mut self) -> Result<(), Error> {
        self.store
            .apply_full_resume_state(&mut self.transport, self.layout)
            .await
    }

    /// Masked update of one slot.
    ///
    /// Before hardware init the change is only staged in the resume state;
    /// the next full write carries it to the device.
    pub(crate) async fn update_register(
        &mut self,
        slot: Slot,
        mask: u8,
        bits: u8,
    ) -> Result<(), Error> {
        if self.hw_initialized {
            self.store
                .update_register(&mut self.transport, self.layout, slot, mask, bits)
                .await?;
        } else {
            self.store.stage(slot, mask, bits);
        }
        Ok(())
    }

    pub(crate) async fn set_poll_interval(&mut self, interval_ms: u32) -> Result<(), Error> {
        if interval_ms < self.config.min_interval_ms {
            return Err(Error::Validation);
        }
        let value = self.rates.mode_control_value(interval_ms);
        if self.hw_initialized && !self.suspended {
            self.store
                .write_register(&mut self.transport, self.layout, Slot::ModeControl, value)
                .await?;
        } else {
            self.store.stage(Slot::ModeControl, 0xFF, value);
        }
        self.config.poll_interval_ms = interval_ms;
        log_debug!("poll interval {} ms, CTRL1 {:#x}", interval_ms, value);
        Ok(())
    }

    pub(crate) async fn set_range(&mut self, range: GyroRange) -> Result<(), Error> {
        self.update_register(Slot::Range, ctrl4::FS_MASK, range.bits())
            .await?;
        self.config.range = range;
        Ok(())
    }

    pub(crate) async fn set_watermark(&mut self, watermark: u8) -> Result<u8, Error> {
        let bits = watermark_bits(watermark);
        self.update_register(Slot::FifoControl, fifo_ctrl::WTM_MASK, bits)
            .await?;
        self.config.watermark = bits;
        Ok(bits)
    }

    /// Switches FIFO mode and the interrupt routing that goes with it.
    ///
    /// `Fifo` and `Bypass` also switch FIFO accumulation; the remaining modes
    /// clear routing and leave accumulation as it was.
    pub(crate) async fn set_fifo_mode(&mut self, mode: FifoMode) -> Result<(), Error> {
        self.update_register(Slot::InterruptSelect, ctrl3::I2_MASK, mode.routing().bits())
            .await?;
        self.write_fifo_mode(mode).await?;
        if let Some(on) = mode.accumulation() {
            self.update_register(Slot::FifoEnable, ctrl5::FIFO_EN, fifo_en_bits(on))
                .await?;
        }
        Ok(())
    }

    /// Accepts a raw FIFO_CTRL mode value.
    ///
    /// A value that is not a mode only clears the routing.
    pub(crate) async fn set_fifo_mode_bits(&mut self, bits: u8) -> Result<(), Error> {
        if let Some(mode) = FifoMode::from_bits(bits) {
            return self.set_fifo_mode(mode).await;
        }
        log_warn!("unknown FIFO mode {:#x}, routing cleared", bits);
        self.update_register(Slot::InterruptSelect, ctrl3::I2_MASK, 0)
            .await
    }

    /// Restarts FIFO collection by passing through `Bypass`.
    ///
    /// The configured mode stays the target throughout, so a failed re-arm
    /// is retried by the next drain and restored by the next full write.
    pub(crate) async fn reset_fifo(&mut self) -> Result<(), Error> {
        let target = self.config.fifo_mode;
        self.update_register(Slot::FifoControl, fifo_ctrl::MODE_MASK, FifoMode::Bypass.bits())
            .await?;
        let rearm = self
            .update_register(Slot::FifoControl, fifo_ctrl::MODE_MASK, target.bits())
            .await;
        if rearm.is_err() {
            self.store
                .stage(Slot::FifoControl, fifo_ctrl::MODE_MASK, target.bits());
        }
        rearm
    }

    async fn write_fifo_mode(&mut self, mode: FifoMode) -> Result<(), Error> {
        self.update_register(Slot::FifoControl, fifo_ctrl::MODE_MASK, mode.bits())
            .await?;
        self.config.fifo_mode = mode;
        Ok(())
    }

    pub(crate) async fn acquire_sample(&mut self) -> Result<Sample, Error> {
        self.sampler.acquire(&mut self.transport).await
    }

    /// One polling step. Returns `false` when polling is paused.
    ///
    /// In `Fifo` mode the output registers belong to the drain, so polling
    /// stands aside.
    pub(crate) async fn poll<S: EventSink>(&mut self, sink: &mut S) -> Result<bool, Error> {
        if self.suspended || self.config.fifo_mode == FifoMode::Fifo {
            return Ok(false);
        }
        let sample = self.acquire_sample().await?;
        sink.report(sample);
        Ok(true)
    }

    /// Drains the device after an interrupt and returns the samples reported.
    pub(crate) async fn drain<S: EventSink>(&mut self, sink: &mut S) -> Result<usize, Error> {
        match self.config.fifo_mode {
            FifoMode::Bypass => {
                let sample = self.acquire_sample().await?;
                sink.report(sample);
                Ok(1)
            }
            FifoMode::Fifo => {
                let src = self.transport.read_reg(self.layout.fifo_src_addr()).await?;
                let status = FifoStatus::from_src(src);
                // The watermark, not FIFO_SRC, bounds the drain.
                let samples = usize::from(self.config.watermark) + 1;
                log_trace!("drain {} samples, {} stored", samples, status.stored);
                for _ in 0..samples {
                    let sample = self.acquire_sample().await?;
                    sink.report(sample);
                }
                self.reset_fifo().await?;
                Ok(samples)
            }
            other => {
                log_debug!("no drain in {:?} mode", other);
                Ok(0)
            }
        }
    }

    /// Puts the part into power-down without touching the resume state.
    pub(crate) async fn soft_power_off(&mut self) -> Result<(), Error> {
        self.transport
            .write_reg(self.layout.slot_addr(Slot::ModeControl), ctrl1::PM_OFF)
            .await
    }

    /// Sleep: normal power with every axis off. The resume state keeps the
    /// running configuration.
    pub(crate) async fn suspend(&mut self) -> Result<(), Error> {
        let addr = self.layout.slot_addr(Slot::ModeControl);
        let current = self.transport.read_reg(addr).await?;
        let sleep = mask_merge(
            current,
            ctrl1::POWER_AXES_MASK,
            ctrl1::ENABLE_NO_AXES | ctrl1::PM_NORMAL,
        );
        self.transport.write_reg(addr, sleep).await?;
        self.suspended = true;
        Ok(())
    }

    pub(crate) async fn resume(&mut self) -> Result<(), Error> {
        let value = self.store.resume().get(Slot::ModeControl);
        self.transport
            .write_reg(self.layout.slot_addr(Slot::ModeControl), value)
            .await?;
        self.suspended = false;
        Ok(())
    }
}

const fn fifo_en_bits(on: bool) -> u8 {
    if on { ctrl5::FIFO_EN } else { 0 }
}
