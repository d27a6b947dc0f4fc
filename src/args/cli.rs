use clap::Parser;
use std::time::Duration;
use url::Url;

use crate::engine::ServerPolicy;
use crate::measurement::RateUnitKind;
use crate::provider::ProviderKind;

use super::parsers::{
    parse_bool_env, parse_count, parse_duration_arg, parse_positive_usize, parse_url_arg,
};
use super::types::{DirectionSelection, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Measure download and upload throughput against speedtest.net or fast.com servers."
)]
pub struct SpeedArgs {
    /// Speed-test provider whose servers are used
    #[arg(long, value_enum, default_value_t = ProviderKind::Ookla)]
    pub provider: ProviderKind,

    /// Number of servers to request from discovery (0 is treated as 1)
    #[arg(long = "servers", short = 's', default_value = "1", value_parser = parse_count)]
    pub server_count: usize,

    /// fast.com API token (required for --provider netflix)
    #[arg(long, env = "SPEEDPROBE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directions to measure
    #[arg(long, short = 'd', value_enum, default_value_t = DirectionSelection::Both)]
    pub direction: DirectionSelection,

    /// Parallel transfers per server
    #[arg(long, short = 'w', default_value = "4", value_parser = parse_positive_usize)]
    pub workload: PositiveUsize,

    /// Upload payload size in characters
    #[arg(long = "upload-size", default_value = "100000", value_parser = parse_positive_usize)]
    pub upload_size: PositiveUsize,

    /// How servers are walked during one measurement
    #[arg(long = "server-policy", value_enum, default_value_t = ServerPolicy::Concurrent)]
    pub server_policy: ServerPolicy,

    /// Per-request timeout, transfer included (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        short = 't',
        default_value = "60s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Cancel the whole run after this long (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub deadline: Option<Duration>,

    /// Override the provider's server list endpoint
    #[arg(long = "discovery-url", value_parser = parse_url_arg)]
    pub discovery_url: Option<Url>,

    /// Unit used for text output
    #[arg(long, short = 'u', value_enum, default_value_t = RateUnitKind::Mbps)]
    pub unit: RateUnitKind,

    /// Output format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML/JSON). Defaults to ./speedprobe.toml or ./speedprobe.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by SPEEDPROBE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
