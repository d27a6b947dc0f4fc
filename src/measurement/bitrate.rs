use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const BITS_IN_BYTE: f64 = 8.0;
const KILO: f64 = 1_000.0;
const MEGA: f64 = 1_000_000.0;

/// Download/upload throughput in bits per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitRate(f64);

impl BitRate {
    #[must_use]
    pub const fn from_bps(bits_per_second: f64) -> Self {
        Self(bits_per_second)
    }

    #[must_use]
    pub const fn bps(self) -> f64 {
        self.0
    }

    #[expect(clippy::float_arithmetic, reason = "unit conversion is a division")]
    #[must_use]
    pub fn kbps(self) -> f64 {
        self.0 / KILO
    }

    #[expect(clippy::float_arithmetic, reason = "unit conversion is a division")]
    #[must_use]
    pub fn mbps(self) -> f64 {
        self.0 / MEGA
    }

    #[must_use]
    pub fn kbps_str(self) -> String {
        format!("{:.3} Kbps", self.kbps())
    }

    #[must_use]
    pub fn mbps_str(self) -> String {
        format!("{:.3} Mbps", self.mbps())
    }

    /// Renders the rate in the requested unit.
    #[must_use]
    pub fn display_in(self, unit: RateUnitKind) -> String {
        match unit {
            RateUnitKind::Bps => self.to_string(),
            RateUnitKind::Kbps => self.kbps_str(),
            RateUnitKind::Mbps => self.mbps_str(),
        }
    }

    /// Arithmetic mean of the given rates, `None` when there are none.
    #[expect(clippy::float_arithmetic, reason = "averaging rates")]
    #[expect(
        clippy::cast_precision_loss,
        reason = "server counts are far below f64 precision limits"
    )]
    #[must_use]
    pub fn average(rates: &[BitRate]) -> Option<Self> {
        if rates.is_empty() {
            return None;
        }
        let sum: f64 = rates.iter().map(|rate| rate.0).sum();
        Some(Self(sum / rates.len() as f64))
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} bps", self.0)
    }
}

/// Unit used when printing a [`BitRate`].
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateUnitKind {
    Bps,
    Kbps,
    #[default]
    Mbps,
}

/// Converts a byte count moved over `elapsed` into bits per second.
///
/// `elapsed` must be non-zero; callers clamp it before calling.
#[expect(clippy::float_arithmetic, reason = "rate derivation")]
#[expect(
    clippy::cast_precision_loss,
    reason = "byte counts stay well inside f64's exact integer range"
)]
#[must_use]
pub fn bits_per_second(bytes: u64, elapsed: Duration) -> BitRate {
    BitRate(bytes as f64 * BITS_IN_BYTE / elapsed.as_secs_f64())
}
