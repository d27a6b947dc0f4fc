/// Sent with every request made by the CLI.
pub const DEFAULT_USER_AGENT: &str = concat!("speedprobe/", env!("CARGO_PKG_VERSION"));
