extern crate std;

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::barometer::Clock;
use crate::data::Sample;
use crate::error::Error;
use crate::interface::RegisterTransport;
use crate::interrupt::InterruptSource;
use crate::power::PowerHook;
use crate::sink::EventSink;

/// Completes on the second poll, giving other joined futures a turn.
pub(crate) struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub(crate) fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

#[derive(Debug)]
struct MockState {
    regs: [u8; 256],
    writes: Vec<(u8, u8)>,
    write_bursts: Vec<(u8, Vec<u8>)>,
    reads: Vec<(u8, usize)>,
    fail_read_at: Option<u8>,
    fail_write_at: Option<u8>,
    writes_before_failure: usize,
}

/// Register file shared between the device under test and the test body.
#[derive(Clone, Debug)]
pub(crate) struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockInterface {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                regs: [0u8; 256],
                writes: Vec::new(),
                write_bursts: Vec::new(),
                reads: Vec::new(),
                fail_read_at: None,
                fail_write_at: None,
                writes_before_failure: 0,
            })),
        }
    }
}

impl MockInterface {
    pub(crate) fn with_reg(self, reg: u8, value: u8) -> Self {
        self.set_reg(reg, value);
        self
    }

    pub(crate) fn with_regs(self, reg: u8, values: &[u8]) -> Self {
        for (offset, value) in values.iter().enumerate() {
            self.set_reg(reg.wrapping_add(offset as u8), *value);
        }
        self
    }

    pub(crate) fn set_reg(&self, reg: u8, value: u8) {
        self.state.borrow_mut().regs[reg as usize] = value;
    }

    pub(crate) fn reg(&self, reg: u8) -> u8 {
        self.state.borrow().regs[reg as usize]
    }

    /// Single-register writes, in order.
    pub(crate) fn writes(&self) -> Vec<(u8, u8)> {
        self.state.borrow().writes.clone()
    }

    /// Values written to one register, in order.
    pub(crate) fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(addr, _)| *addr == reg)
            .map(|(_, value)| *value)
            .collect()
    }

    pub(crate) fn write_bursts(&self) -> Vec<(u8, Vec<u8>)> {
        self.state.borrow().write_bursts.clone()
    }

    /// Number of reads starting at `reg`.
    pub(crate) fn reads_of(&self, reg: u8) -> usize {
        self.state
            .borrow()
            .reads
            .iter()
            .filter(|(addr, _)| *addr == reg)
            .count()
    }

    pub(crate) fn fail_reads_at(&self, reg: u8) {
        self.state.borrow_mut().fail_read_at = Some(reg);
    }

    pub(crate) fn fail_writes_at(&self, reg: u8) {
        self.fail_writes_at_after(reg, 0);
    }

    /// Lets `passing` more writes to `reg` land, then fails the rest.
    pub(crate) fn fail_writes_at_after(&self, reg: u8, passing: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_write_at = Some(reg);
        state.writes_before_failure = passing;
    }

    pub(crate) fn clear_failures(&self) {
        let mut state = self.state.borrow_mut();
        state.fail_read_at = None;
        state.fail_write_at = None;
    }

    pub(crate) fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.writes.clear();
        state.write_bursts.clear();
        state.reads.clear();
    }
}

impl RegisterTransport for MockInterface {
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_read_at == Some(reg) {
            return Err(Error::TransportRead);
        }
        state.reads.push((reg, buffer.len()));
        for (offset, slot) in buffer.iter_mut().enumerate() {
            let addr = reg.wrapping_add(offset as u8);
            *slot = state.regs[addr as usize];
        }
        Ok(())
    }

    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_write_at == Some(reg) {
            if state.writes_before_failure == 0 {
                return Err(Error::TransportWrite);
            }
            state.writes_before_failure -= 1;
        }
        for (offset, value) in data.iter().enumerate() {
            let addr = reg.wrapping_add(offset as u8);
            state.regs[addr as usize] = *value;
        }
        if let [value] = data {
            state.writes.push((reg, *value));
        } else {
            state.write_bursts.push((reg, data.to_vec()));
        }
        Ok(())
    }
}

#[derive(Default, Debug)]
pub(crate) struct MockDelay {
    pub(crate) calls: u32,
    pub(crate) last_ns: Option<u32>,
    pub(crate) total_ns: u64,
    yielding: bool,
}

impl MockDelay {
    /// A delay that yields once so joined futures interleave.
    pub(crate) fn yielding() -> Self {
        Self {
            yielding: true,
            ..Self::default()
        }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.last_ns = Some(ns);
        self.total_ns += u64::from(ns);
        if self.yielding {
            yield_now().await;
        }
    }
}

#[derive(Default, Debug)]
struct IrqState {
    enabled: bool,
    enables: u32,
    disables: u32,
    acks: u32,
}

#[derive(Clone, Default, Debug)]
pub(crate) struct MockInterrupt {
    state: Rc<RefCell<IrqState>>,
}

impl MockInterrupt {
    pub(crate) fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub(crate) fn enables(&self) -> u32 {
        self.state.borrow().enables
    }

    pub(crate) fn disables(&self) -> u32 {
        self.state.borrow().disables
    }

    pub(crate) fn acks(&self) -> u32 {
        self.state.borrow().acks
    }
}

impl InterruptSource for MockInterrupt {
    fn enable(&mut self) {
        let mut state = self.state.borrow_mut();
        state.enabled = true;
        state.enables += 1;
    }

    fn disable(&mut self) {
        let mut state = self.state.borrow_mut();
        state.enabled = false;
        state.disables += 1;
    }

    fn acknowledge(&mut self) {
        self.state.borrow_mut().acks += 1;
    }
}

#[derive(Default, Debug)]
struct PowerState {
    on: bool,
    ons: u32,
    offs: u32,
    fail_on: bool,
    fail_off: bool,
}

#[derive(Clone, Default, Debug)]
pub(crate) struct MockPower {
    state: Rc<RefCell<PowerState>>,
}

impl MockPower {
    pub(crate) fn is_on(&self) -> bool {
        self.state.borrow().on
    }

    pub(crate) fn ons(&self) -> u32 {
        self.state.borrow().ons
    }

    pub(crate) fn offs(&self) -> u32 {
        self.state.borrow().offs
    }

    pub(crate) fn fail_power_on(&self, fail: bool) {
        self.state.borrow_mut().fail_on = fail;
    }

    pub(crate) fn fail_power_off(&self, fail: bool) {
        self.state.borrow_mut().fail_off = fail;
    }
}

impl PowerHook for MockPower {
    type Error = ();

    async fn power_on(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.ons += 1;
        if state.fail_on {
            return Err(());
        }
        state.on = true;
        Ok(())
    }

    async fn power_off(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.offs += 1;
        if state.fail_off {
            return Err(());
        }
        state.on = false;
        Ok(())
    }
}

#[derive(Clone, Default, Debug)]
pub(crate) struct RecordingSink {
    samples: Rc<RefCell<Vec<Sample>>>,
}

impl RecordingSink {
    pub(crate) fn samples(&self) -> Vec<Sample> {
        self.samples.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.borrow().len()
    }
}

impl EventSink for RecordingSink {
    fn report(&mut self, sample: Sample) {
        self.samples.borrow_mut().push(sample);
    }
}

#[derive(Clone, Default, Debug)]
pub(crate) struct MockClock {
    now_ms: Rc<Cell<u64>>,
}

impl MockClock {
    pub(crate) fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Interrupt input that reports `edges` occurrences, then errors.
#[derive(Debug)]
pub(crate) struct MockPin {
    edges: u32,
}

impl MockPin {
    pub(crate) fn with_edges(edges: u32) -> Self {
        Self { edges }
    }

    async fn next_edge(&mut self) -> Result<(), ErrorKind> {
        if self.edges == 0 {
            return Err(ErrorKind::Other);
        }
        self.edges -= 1;
        yield_now().await;
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl Wait for MockPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }
}
