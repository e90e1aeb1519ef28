//! FIFO mode and status helpers.

use crate::interrupt::InterruptRouting;
use crate::register::{fifo_ctrl, fifo_src};

/// Hardware FIFO mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoMode {
    /// FIFO bypassed; output registers hold the latest sample.
    #[default]
    Bypass,
    /// Collect until full, then stop.
    Fifo,
    /// Collect continuously, overwriting the oldest sample.
    Stream,
    /// Stream until a trigger event, then behave as `Fifo`.
    StreamToFifo,
    /// Bypass until a trigger event, then behave as `Stream`.
    BypassToStream,
}

impl FifoMode {
    /// Returns the FIFO_CTRL mode field value.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bypass => 0x00,
            Self::Fifo => 0x20,
            Self::Stream => 0x40,
            Self::StreamToFifo => 0x60,
            Self::BypassToStream => 0x80,
        }
    }

    /// Decodes a FIFO_CTRL mode field value.
    ///
    /// Bits outside the mode field must be clear.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Bypass),
            0x20 => Some(Self::Fifo),
            0x40 => Some(Self::Stream),
            0x60 => Some(Self::StreamToFifo),
            0x80 => Some(Self::BypassToStream),
            _ => None,
        }
    }

    /// Interrupt routing this mode drives.
    ///
    /// Only `Fifo` and `Bypass` have dedicated routing; other modes leave the
    /// interrupt line unrouted.
    pub const fn routing(self) -> InterruptRouting {
        match self {
            Self::Fifo => InterruptRouting::FIFO,
            Self::Bypass => InterruptRouting::DATA_READY,
            _ => InterruptRouting::NONE,
        }
    }

    /// Whether this mode turns FIFO accumulation on (`Some(true)`), off
    /// (`Some(false)`), or leaves it as it is (`None`).
    pub const fn accumulation(self) -> Option<bool> {
        match self {
            Self::Fifo => Some(true),
            Self::Bypass => Some(false),
            _ => None,
        }
    }
}

/// Reduces a requested watermark into the hardware range.
pub const fn watermark_bits(watermark: u8) -> u8 {
    watermark % fifo_ctrl::DEPTH
}

/// FIFO status decoded from FIFO_SRC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// Watermark level reached.
    pub watermark: bool,
    /// FIFO overrun occurred.
    pub overrun: bool,
    /// FIFO is empty.
    pub empty: bool,
    /// Number of unread samples.
    pub stored: u8,
}

impl FifoStatus {
    /// Decodes a FIFO_SRC register value.
    pub const fn from_src(src: u8) -> Self {
        Self {
            watermark: src & fifo_src::WTM != 0,
            overrun: src & fifo_src::OVRN != 0,
            empty: src & fifo_src::EMPTY != 0,
            stored: src & fifo_src::FSS_MASK,
        }
    }
}
