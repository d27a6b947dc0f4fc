//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::SpeedArgs;
pub use types::{DirectionSelection, OutputFormat, PositiveUsize};

pub use defaults::DEFAULT_USER_AGENT;
