//! Gyroscope driver: locking, power transitions and the async tasks.
//!
//! A [`Gyroscope`] is shared by reference between the foreground
//! configuration calls, the poll task ([`Gyroscope::run_poller`]) and the
//! interrupt task ([`Gyroscope::service_interrupts`]). Every register access
//! runs under one `embassy_sync` mutex.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::I2c;
use embedded_hal_async::spi::SpiDevice;

use crate::calibration::ResumeState;
use crate::config::{ChipProfile, Config, GyroRange, PowerState, PowerStateMachine};
use crate::data::{FifoMode, Sample};
use crate::device::DeviceCore;
use crate::error::Error;
use crate::interface::{I2cConfig, I2cInterface, RegisterTransport, SpiConfig, SpiInterface};
use crate::interrupt::{InterruptRouting, InterruptSource};
use crate::logging::{log_debug, log_error, log_info, log_trace, log_warn};
use crate::power::PowerHook;
use crate::sink::EventSink;

struct Inner<T, S, IRQ, P> {
    core: DeviceCore<T>,
    sink: S,
    irq: IRQ,
    power: P,
}

/// Three-axis gyroscope driver.
///
/// `M` picks the mutex flavour (`CriticalSectionRawMutex` on hardware),
/// `T` the register transport and `S` the sample sink. The interrupt line
/// and the board power hook default to `()`.
pub struct Gyroscope<M: RawMutex, T, S, IRQ = (), P = ()> {
    inner: Mutex<M, Inner<T, S, IRQ, P>>,
    state: PowerStateMachine,
    wake: Signal<M, ()>,
}

/// I2C type alias for the gyroscope driver.
pub type GyroscopeI2c<M, I2C, S, IRQ = (), P = ()> = Gyroscope<M, I2cInterface<I2C>, S, IRQ, P>;
/// SPI type alias for the gyroscope driver.
pub type GyroscopeSpi<M, SPI, S, IRQ = (), P = ()> = Gyroscope<M, SpiInterface<SPI>, S, IRQ, P>;

impl<M, T, S, IRQ, P> Gyroscope<M, T, S, IRQ, P>
where
    M: RawMutex,
{
    /// Creates a driver for the default chip profile.
    pub fn new(transport: T, sink: S, irq: IRQ, power: P, config: Config) -> Result<Self, Error> {
        Self::with_profile(transport, sink, irq, power, ChipProfile::LSM330, config)
    }

    /// Creates a driver for a specific chip profile.
    ///
    /// The configuration is validated and staged; nothing touches the bus
    /// until [`enable`](Self::enable) or [`probe`](Self::probe).
    pub fn with_profile(
        transport: T,
        sink: S,
        irq: IRQ,
        power: P,
        profile: ChipProfile,
        config: Config,
    ) -> Result<Self, Error> {
        let core = DeviceCore::new(transport, profile, config)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                core,
                sink,
                irq,
                power,
            }),
            state: PowerStateMachine::new(),
            wake: Signal::new(),
        })
    }

    /// Returns the current power state.
    pub fn power_state(&self) -> PowerState {
        self.state.state()
    }

    /// Returns true once an enable transition has completed.
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Consumes the driver and returns the transport and collaborators.
    pub fn release(self) -> (T, S, IRQ, P) {
        let inner = self.inner.into_inner();
        (inner.core.release(), inner.sink, inner.irq, inner.power)
    }
}

impl<M, I2C, S, IRQ, P> Gyroscope<M, I2cInterface<I2C>, S, IRQ, P>
where
    M: RawMutex,
    I2C: I2c,
{
    /// Creates an I2C-based driver.
    pub fn new_i2c(
        i2c: I2C,
        i2c_config: I2cConfig,
        sink: S,
        irq: IRQ,
        power: P,
        config: Config,
    ) -> Result<Self, Error> {
        Self::new(I2cInterface::new(i2c, i2c_config), sink, irq, power, config)
    }
}

impl<M, SPI, S, IRQ, P> Gyroscope<M, SpiInterface<SPI>, S, IRQ, P>
where
    M: RawMutex,
    SPI: SpiDevice,
{
    /// Creates an SPI-based driver.
    pub fn new_spi(
        spi: SPI,
        spi_config: SpiConfig,
        sink: S,
        irq: IRQ,
        power: P,
        config: Config,
    ) -> Result<Self, Error> {
        Self::new(SpiInterface::new(spi, spi_config), sink, irq, power, config)
    }
}

impl<M, T, S, IRQ, P> Gyroscope<M, T, S, IRQ, P>
where
    M: RawMutex,
    T: RegisterTransport,
    S: EventSink,
    IRQ: InterruptSource,
    P: PowerHook,
{
    /// Checks the identity register and the bus path, then powers back down.
    ///
    /// On an enabled device this only verifies the identity register.
    pub async fn probe(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        let Inner { core, power, .. } = &mut *inner;
        if self.state.state() != PowerState::Disabled {
            return core.verify_device().await;
        }

        power.power_on().await.map_err(|_| Error::PowerOn)?;
        let result = async {
            core.verify_device().await?;
            core.apply_full_resume_state()
                .await
                .map_err(|_| Error::HardwareInit)?;
            core.soft_power_off().await
        }
        .await;
        core.set_hw_initialized(false);
        let off = power.power_off().await;

        result?;
        off.map_err(|_| Error::PowerOff)?;
        log_info!("gyroscope probed");
        Ok(())
    }

    /// Powers the device up and starts sampling. A no-op when already
    /// enabled.
    ///
    /// On failure the device stays `Disabled`.
    pub async fn enable(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if !self.state.begin_enable() {
            log_debug!("enable ignored in {:?}", self.state.state());
            return Ok(());
        }
        let Inner {
            core, irq, power, ..
        } = &mut *inner;

        if power.power_on().await.is_err() {
            log_error!("power-on hook failed");
            self.state.settle(PowerState::Disabled);
            return Err(Error::PowerOn);
        }

        if !core.hw_initialized() {
            if let Err(err) = core.apply_full_resume_state().await {
                log_error!("hardware init failed: {:?}", err);
                if power.power_off().await.is_err() {
                    log_warn!("power-off hook failed after init error");
                }
                self.state.settle(PowerState::Disabled);
                return Err(Error::HardwareInit);
            }
            core.set_hw_initialized(true);
        }

        irq.enable();
        self.state.settle(PowerState::Enabled);
        self.wake.signal(());
        log_info!("gyroscope enabled, {} ms", core.poll_interval_ms());
        Ok(())
    }

    /// Stops sampling and powers the device down. A no-op when already
    /// disabled.
    ///
    /// Waits for an in-flight poll or drain to finish. When the power-off
    /// hook fails the device is still left `Disabled` and the error is
    /// returned.
    pub async fn disable(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if !self.state.begin_disable() {
            log_debug!("disable ignored in {:?}", self.state.state());
            return Ok(());
        }
        let Inner {
            core, irq, power, ..
        } = &mut *inner;

        irq.disable();
        if let Err(err) = core.soft_power_off().await {
            log_warn!("soft power-off failed: {:?}", err);
        }
        let off = power.power_off().await;
        core.set_hw_initialized(false);
        self.state.settle(PowerState::Disabled);

        if off.is_err() {
            log_error!("power-off hook failed");
            return Err(Error::PowerOff);
        }
        log_info!("gyroscope disabled");
        Ok(())
    }

    /// Enables or disables the device.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
        if enabled {
            self.enable().await
        } else {
            self.disable().await
        }
    }

    /// Returns the active configuration, normalized.
    pub async fn config(&self) -> Config {
        self.inner.lock().await.core.config()
    }

    /// Returns the polling interval in milliseconds.
    pub async fn poll_interval_ms(&self) -> u32 {
        self.inner.lock().await.core.poll_interval_ms()
    }

    /// Sets the polling interval and the matching output data rate.
    ///
    /// Fails with [`Error::Validation`] below the configured minimum.
    pub async fn set_poll_interval_ms(&self, interval_ms: u32) -> Result<(), Error> {
        self.inner
            .lock()
            .await
            .core
            .set_poll_interval(interval_ms)
            .await
    }

    /// Returns the full-scale range.
    pub async fn range(&self) -> GyroRange {
        self.inner.lock().await.core.range()
    }

    /// Sets the full-scale range.
    pub async fn set_range(&self, range: GyroRange) -> Result<(), Error> {
        self.inner.lock().await.core.set_range(range).await
    }

    /// Sets the full-scale range from a value in dps (250, 500 or 2000).
    pub async fn set_range_dps(&self, dps: u16) -> Result<(), Error> {
        self.set_range(GyroRange::from_dps(dps)?).await
    }

    /// Sensitivity of the active range in µdps/LSB.
    pub async fn sensitivity(&self) -> i32 {
        self.inner.lock().await.core.sensitivity()
    }

    /// Returns the FIFO watermark.
    pub async fn watermark(&self) -> u8 {
        self.inner.lock().await.core.watermark()
    }

    /// Sets the FIFO watermark, reduced modulo the FIFO depth. Returns the
    /// value applied.
    pub async fn set_watermark(&self, watermark: u8) -> Result<u8, Error> {
        self.inner.lock().await.core.set_watermark(watermark).await
    }

    /// Returns the FIFO mode.
    pub async fn fifo_mode(&self) -> FifoMode {
        self.inner.lock().await.core.fifo_mode()
    }

    /// Sets the FIFO mode together with its interrupt routing.
    pub async fn set_fifo_mode(&self, mode: FifoMode) -> Result<(), Error> {
        self.inner.lock().await.core.set_fifo_mode(mode).await
    }

    /// Sets the FIFO mode from a raw FIFO_CTRL mode value.
    ///
    /// A value that is not a mode clears the interrupt routing and
    /// otherwise leaves the FIFO alone.
    pub async fn set_fifo_mode_bits(&self, bits: u8) -> Result<(), Error> {
        self.inner.lock().await.core.set_fifo_mode_bits(bits).await
    }

    /// Restarts FIFO collection in the current mode.
    pub async fn reset_fifo(&self) -> Result<(), Error> {
        self.inner.lock().await.core.reset_fifo().await
    }

    /// Returns the events routed to the interrupt line.
    pub async fn interrupt_routing(&self) -> InterruptRouting {
        self.inner.lock().await.core.routing()
    }

    /// Returns a copy of the cached register state.
    pub async fn resume_state(&self) -> ResumeState {
        self.inner.lock().await.core.resume_state()
    }

    /// Reads one sample without reporting it.
    pub async fn acquire_sample(&self) -> Result<Sample, Error> {
        self.inner.lock().await.core.acquire_sample().await
    }

    /// Checks the identity register.
    pub async fn verify_device(&self) -> Result<(), Error> {
        self.inner.lock().await.core.verify_device().await
    }

    /// Puts an enabled device to sleep and pauses polling.
    pub async fn suspend(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if !self.state.is_enabled() {
            return Ok(());
        }
        inner.core.suspend().await?;
        log_info!("gyroscope suspended");
        Ok(())
    }

    /// Returns true while the device is suspended.
    pub async fn is_suspended(&self) -> bool {
        self.inner.lock().await.core.is_suspended()
    }

    /// Wakes a suspended device with its cached rate settings.
    pub async fn resume(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if !self.state.is_enabled() {
            return Ok(());
        }
        inner.core.resume().await?;
        log_info!("gyroscope resumed");
        Ok(())
    }

    /// Services one interrupt occurrence.
    ///
    /// The source stays disabled while the drain runs and is re-enabled
    /// only if the device is still enabled afterwards. Drain errors are
    /// logged.
    pub async fn handle_interrupt(&self) {
        let mut inner = self.inner.lock().await;
        let Inner {
            core, sink, irq, ..
        } = &mut *inner;

        irq.disable();
        if self.state.is_enabled() {
            match core.drain(sink).await {
                Ok(count) => log_trace!("drained {} samples", count),
                Err(err) => log_warn!("drain aborted: {:?}", err),
            }
        }
        irq.acknowledge();
        if self.state.is_enabled() {
            irq.enable();
        }
    }

    /// Interrupt task: handles every rising edge on `line`.
    ///
    /// Returns only when the line reports an error.
    pub async fn service_interrupts<W: Wait>(&self, line: &mut W) -> Result<Infallible, W::Error> {
        loop {
            line.wait_for_rising_edge().await?;
            self.handle_interrupt().await;
        }
    }

    /// Polls at the configured interval until the device is disabled.
    ///
    /// The lock is held for each sample read and report, so
    /// [`disable`](Self::disable) returning means no further reports.
    pub async fn poll_until_disabled<D: DelayNs>(&self, delay: &mut D) {
        loop {
            let interval_ms = {
                let inner = self.inner.lock().await;
                if !self.state.is_enabled() {
                    return;
                }
                inner.core.poll_interval_ms()
            };
            delay.delay_ms(interval_ms).await;

            let mut inner = self.inner.lock().await;
            if !self.state.is_enabled() {
                return;
            }
            let Inner { core, sink, .. } = &mut *inner;
            if let Err(err) = core.poll(sink).await {
                log_warn!("poll failed: {:?}", err);
            }
        }
    }

    /// Poll task: sleeps while disabled, polls while enabled.
    pub async fn run_poller<D: DelayNs>(&self, delay: &mut D) {
        loop {
            while !self.state.is_enabled() {
                self.wake.wait().await;
            }
            self.poll_until_disabled(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::digital::ErrorKind;
    use futures::executor::block_on;

    use super::*;
    use crate::testing::mock::yield_now;
    use crate::testing::{MockDelay, MockInterface, MockInterrupt, MockPin, MockPower, RecordingSink};

    const CTRL1: u8 = 0x20;
    const FIFO_CTRL: u8 = 0x2E;
    const FIFO_SRC: u8 = 0x2F;
    const WHO_AM_I: u8 = 0x0F;

    type TestGyro = Gyroscope<NoopRawMutex, MockInterface, RecordingSink, MockInterrupt, MockPower>;

    struct Rig {
        iface: MockInterface,
        sink: RecordingSink,
        irq: MockInterrupt,
        power: MockPower,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                iface: MockInterface::default().with_reg(WHO_AM_I, 0xD4),
                sink: RecordingSink::default(),
                irq: MockInterrupt::default(),
                power: MockPower::default(),
            }
        }

        fn gyro(&self, config: Config) -> TestGyro {
            Gyroscope::new(
                self.iface.clone(),
                self.sink.clone(),
                self.irq.clone(),
                self.power.clone(),
                config,
            )
            .expect("gyro")
        }
    }

    #[test]
    fn enable_twice_initializes_once() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());

        block_on(gyro.enable()).expect("first");
        block_on(gyro.enable()).expect("second");

        assert_eq!(gyro.power_state(), PowerState::Enabled);
        assert_eq!(rig.iface.write_bursts().len(), 1);
        assert_eq!(rig.power.ons(), 1);
        assert_eq!(rig.irq.enables(), 1);
    }

    #[test]
    fn disable_twice_powers_off_once() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");

        block_on(gyro.disable()).expect("first");
        block_on(gyro.disable()).expect("second");

        assert_eq!(gyro.power_state(), PowerState::Disabled);
        assert_eq!(rig.power.offs(), 1);
        assert!(!rig.irq.is_enabled());
        assert_eq!(rig.iface.reg(CTRL1), 0x00);
    }

    #[test]
    fn disable_without_enable_is_noop() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        assert_eq!(block_on(gyro.disable()), Ok(()));
        assert_eq!(rig.power.offs(), 0);
        assert!(rig.iface.writes().is_empty());
    }

    #[test]
    fn power_on_failure_leaves_device_disabled() {
        let rig = Rig::new();
        rig.power.fail_power_on(true);
        let gyro = rig.gyro(Config::new());

        assert_eq!(block_on(gyro.enable()), Err(Error::PowerOn));
        assert_eq!(gyro.power_state(), PowerState::Disabled);
        assert!(rig.iface.write_bursts().is_empty());
        assert!(!rig.irq.is_enabled());

        rig.power.fail_power_on(false);
        assert_eq!(block_on(gyro.enable()), Ok(()));
        assert!(gyro.is_enabled());
    }

    #[test]
    fn init_failure_powers_back_off() {
        let rig = Rig::new();
        rig.iface.fail_writes_at(CTRL1);
        let gyro = rig.gyro(Config::new());

        assert_eq!(block_on(gyro.enable()), Err(Error::HardwareInit));
        assert_eq!(gyro.power_state(), PowerState::Disabled);
        assert_eq!(rig.power.offs(), 1);
        assert!(!rig.power.is_on());
        assert_eq!(rig.irq.enables(), 0);
    }

    #[test]
    fn power_off_failure_still_disables() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        rig.power.fail_power_off(true);

        assert_eq!(block_on(gyro.disable()), Err(Error::PowerOff));
        assert_eq!(gyro.power_state(), PowerState::Disabled);
        assert!(!rig.irq.is_enabled());
    }

    #[test]
    fn reenable_rewrites_resume_state() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        block_on(gyro.set_range(GyroRange::Dps2000)).expect("range");
        block_on(gyro.disable()).expect("disable");
        rig.iface.clear_log();

        block_on(gyro.enable()).expect("enable again");

        let bursts = rig.iface.write_bursts();
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].1[3], 0xA0);
    }

    #[test]
    fn poll_at_six_ms_stops_reporting_after_disable() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new().with_poll_interval_ms(6));
        block_on(gyro.enable()).expect("enable");
        assert_eq!(rig.iface.reg(CTRL1), 0x4F);

        let mut delay = MockDelay::yielding();
        block_on(async {
            futures::join!(gyro.poll_until_disabled(&mut delay), async {
                for _ in 0..6 {
                    yield_now().await;
                }
                gyro.disable().await.expect("disable");
            });
        });

        let reported = rig.sink.len();
        assert!(reported > 0);
        assert!(delay.calls > 0);
        assert!(!rig.irq.is_enabled());

        block_on(gyro.poll_until_disabled(&mut delay));
        assert_eq!(rig.sink.len(), reported);
    }

    #[test]
    fn poller_wakes_on_enable() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        let mut delay = MockDelay::yielding();

        let poller = core::pin::pin!(gyro.run_poller(&mut delay));
        let enabler = core::pin::pin!(async {
            yield_now().await;
            assert_eq!(rig.sink.len(), 0);
            gyro.enable().await.expect("enable");
            while rig.sink.len() < 2 {
                yield_now().await;
            }
        });
        block_on(futures::future::select(poller, enabler));

        assert!(rig.sink.len() >= 2);
    }

    #[test]
    fn fifo_interrupt_drains_watermark_plus_one() {
        let rig = Rig::new();
        let gyro = rig.gyro(
            Config::new()
                .with_fifo_mode(FifoMode::Fifo)
                .with_watermark(2),
        );
        block_on(gyro.enable()).expect("enable");
        rig.iface.set_reg(FIFO_SRC, 0x1F);
        rig.iface.clear_log();

        block_on(gyro.handle_interrupt());

        assert_eq!(rig.sink.len(), 3);
        assert_eq!(rig.iface.writes_to(FIFO_CTRL), [0x02, 0x22]);
        assert!(rig.irq.is_enabled());
        assert_eq!(rig.irq.acks(), 1);
    }

    #[test]
    fn fifo_mode_routing_survives_reset() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        block_on(gyro.set_fifo_mode(FifoMode::Fifo)).expect("fifo");

        block_on(gyro.reset_fifo()).expect("reset");

        assert_eq!(block_on(gyro.fifo_mode()), FifoMode::Fifo);
        assert_eq!(block_on(gyro.interrupt_routing()), InterruptRouting::FIFO);
        assert_eq!(rig.iface.reg(0x22), 0x06);
    }

    #[test]
    fn interrupt_while_disabled_does_not_drain() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());

        block_on(gyro.handle_interrupt());

        assert_eq!(rig.sink.len(), 0);
        assert!(!rig.irq.is_enabled());
        assert_eq!(rig.iface.reads_of(0x28), 0);
    }

    #[test]
    fn drain_error_keeps_device_enabled() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        rig.iface.fail_reads_at(0x28);

        block_on(gyro.handle_interrupt());
        assert!(gyro.is_enabled());
        assert!(rig.irq.is_enabled());

        rig.iface.clear_failures();
        block_on(gyro.handle_interrupt());
        assert_eq!(rig.sink.len(), 1);
    }

    #[test]
    fn service_interrupts_runs_until_line_error() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        let mut line = MockPin::with_edges(3);

        let result = block_on(gyro.service_interrupts(&mut line));

        assert_eq!(result, Err(ErrorKind::Other));
        assert_eq!(rig.sink.len(), 3);
        assert_eq!(rig.irq.acks(), 3);
    }

    #[test]
    fn invalid_raw_mode_only_clears_routing() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        block_on(gyro.enable()).expect("enable");
        block_on(gyro.set_fifo_mode(FifoMode::Fifo)).expect("fifo");
        let fifo_ctrl_before = rig.iface.reg(FIFO_CTRL);

        block_on(gyro.set_fifo_mode_bits(0xE0)).expect("permissive");

        assert_eq!(rig.iface.reg(0x22), 0x00);
        assert_eq!(rig.iface.reg(FIFO_CTRL), fifo_ctrl_before);
        assert_eq!(block_on(gyro.fifo_mode()), FifoMode::Fifo);
    }

    #[test]
    fn configuration_validation() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new().with_min_interval_ms(10).with_poll_interval_ms(4));
        assert_eq!(block_on(gyro.config()).poll_interval_ms, 10);

        assert_eq!(block_on(gyro.set_poll_interval_ms(5)), Err(Error::Validation));
        assert_eq!(block_on(gyro.set_range_dps(1000)), Err(Error::Validation));
        assert_eq!(block_on(gyro.set_watermark(40)), Ok(8));
        assert_eq!(block_on(gyro.watermark()), 8);
        assert_eq!(block_on(gyro.set_range_dps(500)), Ok(()));
        assert_eq!(block_on(gyro.sensitivity()), 17_500);
        assert!(rig.iface.writes().is_empty());
    }

    #[test]
    fn suspend_and_resume() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new().with_poll_interval_ms(6));
        assert_eq!(block_on(gyro.suspend()), Ok(()));
        assert!(rig.iface.writes().is_empty());

        block_on(gyro.enable()).expect("enable");
        block_on(gyro.suspend()).expect("suspend");
        assert_eq!(rig.iface.reg(CTRL1), 0x48);
        assert!(block_on(gyro.is_suspended()));

        block_on(gyro.resume()).expect("resume");
        assert_eq!(rig.iface.reg(CTRL1), 0x4F);
        assert!(!block_on(gyro.is_suspended()));
    }

    #[test]
    fn probe_checks_identity_and_powers_down() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());

        assert_eq!(block_on(gyro.probe()), Ok(()));
        assert_eq!(gyro.power_state(), PowerState::Disabled);
        assert_eq!(rig.power.ons(), 1);
        assert_eq!(rig.power.offs(), 1);
        assert_eq!(rig.iface.write_bursts().len(), 1);
        assert_eq!(rig.iface.reg(CTRL1), 0x00);

        block_on(gyro.enable()).expect("enable");
        assert_eq!(rig.iface.write_bursts().len(), 2);
    }

    #[test]
    fn probe_rejects_wrong_device() {
        let rig = Rig::new();
        rig.iface.set_reg(WHO_AM_I, 0x33);
        let gyro = rig.gyro(Config::new());

        assert_eq!(block_on(gyro.probe()), Err(Error::WrongDevice));
        assert_eq!(rig.power.offs(), 1);
        assert!(rig.iface.write_bursts().is_empty());
    }

    #[test]
    fn release_returns_collaborators() {
        let rig = Rig::new();
        let gyro = rig.gyro(Config::new());
        let (iface, _sink, _irq, _power) = gyro.release();
        assert_eq!(iface.reg(WHO_AM_I), 0xD4);
    }
}
