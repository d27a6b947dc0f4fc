use clap::Parser;

use crate::error::{AppError, AppResult};

use super::SpeedArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<SpeedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    SpeedArgs::try_parse_from(args).map_err(AppError::from)
}
