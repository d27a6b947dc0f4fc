use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;
use url::Url;

use crate::args::{PositiveUsize, SpeedArgs};
use crate::error::ConfigError;

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line or through an environment variable win
/// over the file.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut SpeedArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "provider")
        && let Some(provider) = config.provider
    {
        args.provider = provider;
    }

    if !is_cli(matches, "server_count")
        && let Some(servers) = config.servers
    {
        args.server_count = servers;
    }

    if !is_cli(matches, "token")
        && let Some(token) = config.token.clone()
    {
        args.token = Some(token);
    }

    if !is_cli(matches, "direction")
        && let Some(direction) = config.direction
    {
        args.direction = direction;
    }

    if !is_cli(matches, "workload")
        && let Some(workload) = config.workload
    {
        args.workload = ensure_positive_usize(workload, "workload")?;
    }

    if !is_cli(matches, "upload_size")
        && let Some(upload_size) = config.upload_size
    {
        args.upload_size = ensure_positive_usize(upload_size, "upload_size")?;
    }

    if !is_cli(matches, "server_policy")
        && let Some(policy) = config.server_policy
    {
        args.server_policy = policy;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = to_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "deadline")
        && let Some(deadline) = config.deadline.as_ref()
    {
        args.deadline = Some(to_duration(deadline, "deadline")?);
    }

    if !is_cli(matches, "discovery_url")
        && let Some(raw) = config.discovery_url.as_deref()
    {
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidDiscoveryUrl {
            url: raw.to_owned(),
            source,
        })?;
        args.discovery_url = Some(url);
    }

    if !is_cli(matches, "unit")
        && let Some(unit) = config.unit
    {
        args.unit = unit;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_usize(value: usize, field: &str) -> Result<PositiveUsize, ConfigError> {
    PositiveUsize::try_from(value).map_err(|err| ConfigError::FieldMustBePositive {
        field: field.to_owned(),
        source: err,
    })
}

fn to_duration(value: &DurationValue, field: &str) -> Result<Duration, ConfigError> {
    value
        .to_duration()
        .map_err(|source| ConfigError::InvalidDuration {
            field: field.to_owned(),
            source,
        })
}
