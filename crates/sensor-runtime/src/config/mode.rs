//! Power state machine for a sensor instance.

use core::sync::atomic::{AtomicU8, Ordering};

/// Power state of a sensor instance.
///
/// `Enabling` and `Disabling` only exist while a transition is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerState {
    /// Powered off; no polling, interrupt source disabled.
    Disabled = 0,
    /// Transition to `Enabled` in progress.
    Enabling = 1,
    /// Powered, configured and sampling.
    Enabled = 2,
    /// Transition to `Disabled` in progress.
    Disabling = 3,
}

impl PowerState {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::Enabling,
            2 => Self::Enabled,
            3 => Self::Disabling,
            _ => Self::Disabled,
        }
    }
}

/// Compare-and-swap guarded power state.
pub(crate) struct PowerStateMachine {
    state: AtomicU8,
}

impl PowerStateMachine {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(PowerState::Disabled as u8),
        }
    }

    pub(crate) fn state(&self) -> PowerState {
        PowerState::from_bits(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.state() == PowerState::Enabled
    }

    /// Claims the `Disabled -> Enabling` edge. Returns `false` if the
    /// device is not disabled.
    pub(crate) fn begin_enable(&self) -> bool {
        self.transition(PowerState::Disabled, PowerState::Enabling)
    }

    /// Claims the `Enabled -> Disabling` edge. Returns `false` if the
    /// device is not enabled.
    pub(crate) fn begin_disable(&self) -> bool {
        self.transition(PowerState::Enabled, PowerState::Disabling)
    }

    /// Completes whichever transition is in progress.
    pub(crate) fn settle(&self, state: PowerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn transition(&self, from: PowerState, to: PowerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
