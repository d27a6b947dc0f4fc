use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration;
use crate::args::{DirectionSelection, OutputFormat};
use crate::engine::ServerPolicy;
use crate::error::ValidationError;
use crate::measurement::RateUnitKind;
use crate::provider::ProviderKind;

/// Contents of `speedprobe.toml` / `speedprobe.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub provider: Option<ProviderKind>,
    pub servers: Option<usize>,
    pub token: Option<String>,
    pub direction: Option<DirectionSelection>,
    pub workload: Option<usize>,
    pub upload_size: Option<usize>,
    pub server_policy: Option<ServerPolicy>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub deadline: Option<DurationValue>,
    pub discovery_url: Option<String>,
    pub unit: Option<RateUnitKind>,
    pub output_format: Option<OutputFormat>,
}

/// Either a number of seconds or a suffixed string such as `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}
