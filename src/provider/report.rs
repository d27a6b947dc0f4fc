use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::measurement::BitRate;

use super::ProviderKind;

/// Outcome of one CLI run; directions that were not measured stay `None`.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedReport {
    pub provider: ProviderKind,
    pub server_count: usize,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<BitRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<BitRate>,
}

impl SpeedReport {
    #[must_use]
    pub fn new(provider: ProviderKind, server_count: usize) -> Self {
        Self {
            provider,
            server_count,
            started_at: Utc::now(),
            download: None,
            upload: None,
        }
    }
}
