//! Speed-test providers.
//!
//! A provider knows where its server list lives and which URL each transfer
//! direction hits on a listed server. [`build_client`] binds one provider to a
//! request executor and the engine settings.
mod client;
mod discovery;
mod netflix;
mod ookla;
mod report;


use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use client::{ClientConfig, Measurer, SpeedClient, build_client};
pub use netflix::{NETFLIX_DISCOVERY_URL, NetflixDiscovery};
pub use ookla::{OOKLA_DISCOVERY_URL, OoklaDiscovery};
pub use report::SpeedReport;

#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// speedtest.net
    #[default]
    Ookla,
    /// fast.com
    Netflix,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Ookla => "ookla",
            ProviderKind::Netflix => "netflix",
        }
    }

    #[must_use]
    pub const fn default_discovery_url(self) -> &'static str {
        match self {
            ProviderKind::Ookla => OOKLA_DISCOVERY_URL,
            ProviderKind::Netflix => NETFLIX_DISCOVERY_URL,
        }
    }
}
