use std::sync::Arc;

use tracing::info;

use crate::args::{DEFAULT_USER_AGENT, DirectionSelection, SpeedArgs};
use crate::engine::Direction;
use crate::error::{AppError, AppResult, MeasureError};
use crate::http::{ClientOptions, RequestExecutor, build_executor};
use crate::provider::{ClientConfig, Measurer, SpeedClient, SpeedReport, build_client};
use crate::shutdown::{ShutdownReceiver, shutdown_channel};
use crate::shutdown_handlers::{setup_deadline_shutdown_handler, setup_signal_shutdown_handler};

use super::report::render_report;

/// Runs the measurements selected by `args` and prints the report.
///
/// # Errors
///
/// Returns an error when the executor or client cannot be built, when a
/// measurement fails, or when the report cannot be rendered.
pub async fn run_speed_test(args: SpeedArgs) -> AppResult<()> {
    let options = ClientOptions {
        request_timeout: args.request_timeout,
        connect_timeout: args.connect_timeout,
        user_agent: Some(DEFAULT_USER_AGENT.to_owned()),
    };
    let executor: Arc<dyn RequestExecutor> = Arc::new(build_executor(&options)?);

    let report = measure_with_executor(&args, executor).await?;
    println!("{}", render_report(&report, args.unit, args.output_format)?);
    Ok(())
}

pub(super) async fn measure_with_executor(
    args: &SpeedArgs,
    executor: Arc<dyn RequestExecutor>,
) -> AppResult<SpeedReport> {
    let client = build_client(args.provider, client_config(args), executor)?;
    info!(
        "Using {} with {} server(s), {} streams each",
        client.provider().as_str(),
        client.server_count(),
        args.workload.get()
    );

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let deadline_handle = args
        .deadline
        .map(|deadline| setup_deadline_shutdown_handler(&shutdown_tx, deadline));

    let result = measure_selected(&client, args.direction, &shutdown_rx).await;

    // Releases the handlers; the measurement is already over.
    drop(shutdown_tx.send(true));
    signal_handle.await?;
    if let Some(handle) = deadline_handle {
        handle.await?;
    }

    result.map_err(AppError::from)
}

fn client_config(args: &SpeedArgs) -> ClientConfig {
    ClientConfig {
        server_count: args.server_count,
        token: args.token.clone(),
        workload: args.workload.as_non_zero(),
        upload_size: args.upload_size.get(),
        server_policy: args.server_policy,
        discovery_url: args.discovery_url.clone(),
    }
}

async fn measure_selected(
    client: &SpeedClient,
    selection: DirectionSelection,
    shutdown_rx: &ShutdownReceiver,
) -> Result<SpeedReport, MeasureError> {
    if selection == DirectionSelection::Both {
        return client.measure(shutdown_rx).await;
    }

    let mut report = SpeedReport::new(client.provider(), client.server_count());
    if selection.includes(Direction::Download) {
        report.download = Some(client.measure_download(shutdown_rx).await?);
    }
    if selection.includes(Direction::Upload) {
        report.upload = Some(client.measure_upload(shutdown_rx).await?);
    }
    Ok(report)
}
