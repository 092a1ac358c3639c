//! Service-rate derivation for transmission-link nodes.
//!
//! A node standing for an Ethernet link serves one frame per
//! transmission slot: 8 bits per payload byte plus the 96-bit
//! inter-frame gap at the link's bit rate. Capacities are reported per
//! millisecond to keep them on the same scale as the configured
//! arrival rates.

use std::str::FromStr;

use crate::error::{QnetError, Result};

/// Shortest legal Ethernet frame, preamble included, in bytes.
pub const MIN_FRAME_LENGTH: u32 = 72;

/// Longest legal Ethernet frame, preamble included, in bytes.
pub const MAX_FRAME_LENGTH: u32 = 1526;

/// Supported Ethernet link speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthernetType {
    Fast,
    Gigabit,
    TenGig,
    FortyGig,
    HundredGig,
}

impl EthernetType {
    /// Link speed in bits per second.
    pub fn bit_rate(&self) -> u64 {
        match self {
            Self::Fast => 100_000_000,
            Self::Gigabit => 1_000_000_000,
            Self::TenGig => 10_000_000_000,
            Self::FortyGig => 40_000_000_000,
            Self::HundredGig => 100_000_000_000,
        }
    }

    /// Duration of one bit on the link, in seconds.
    pub fn bit_interval(&self) -> f64 {
        1.0 / self.bit_rate() as f64
    }
}

impl FromStr for EthernetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "gigabit" => Ok(Self::Gigabit),
            "10g" => Ok(Self::TenGig),
            "40g" => Ok(Self::FortyGig),
            "100g" => Ok(Self::HundredGig),
            other => Err(format!(
                "unknown ethernet type '{other}' (expected fast|gigabit|10g|40g|100g)"
            )),
        }
    }
}

/// Frames per millisecond a link can carry at the given frame length.
pub fn link_capacity(ethernet: EthernetType, frame_length: u32) -> Result<f64> {
    if !(MIN_FRAME_LENGTH..=MAX_FRAME_LENGTH).contains(&frame_length) {
        return Err(QnetError::FrameLength {
            length: frame_length,
            min: MIN_FRAME_LENGTH,
            max: MAX_FRAME_LENGTH,
        });
    }

    let frame_time = ethernet.bit_interval() * f64::from(8 * frame_length + 96);
    Ok(1.0 / (frame_time * 1e3))
}
