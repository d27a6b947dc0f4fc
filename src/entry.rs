use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::error;

use speedprobe::app::run_speed_test;
use speedprobe::args::SpeedArgs;
use speedprobe::config::{apply_config, load_config};
use speedprobe::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_async(args, &matches));
    if let Err(err) = &result {
        error!("{}", err);
    }
    result
}

fn parse_args() -> AppResult<(SpeedArgs, ArgMatches)> {
    let matches = SpeedArgs::command().get_matches();
    let args = SpeedArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(mut args: SpeedArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    run_speed_test(args).await
}
