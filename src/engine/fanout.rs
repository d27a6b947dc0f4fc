use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::error::MeasureError;
use crate::measurement::{BitRate, bits_per_second};
use crate::shutdown::{ShutdownReceiver, is_shutdown, wait_for_shutdown};

use super::probe::{Direction, TransferProbe};

/// Parallel transfers launched per server.
pub const DEFAULT_WORKLOAD: usize = 4;

/// Floor for the measured span so the rate never divides by zero.
const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Runs `width` concurrent probes against one target and rates the aggregate.
#[derive(Clone)]
pub struct FanoutMeasurer {
    probe: Arc<dyn TransferProbe>,
    width: NonZeroUsize,
}

impl FanoutMeasurer {
    #[must_use]
    pub const fn new(probe: Arc<dyn TransferProbe>, width: NonZeroUsize) -> Self {
        Self { probe, width }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width.get()
    }

    /// Measures the combined rate of `width` simultaneous transfers.
    ///
    /// The span runs from the first dispatch to the last completion. The first
    /// failing probe aborts its siblings and its error is returned as is.
    ///
    /// # Errors
    ///
    /// Returns the first probe error, [`MeasureError::Cancelled`] when shutdown
    /// is requested, or [`MeasureError::NoData`] when nothing was transferred.
    pub async fn measure(
        &self,
        target: Url,
        direction: Direction,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<BitRate, MeasureError> {
        let mut shutdown_rx = shutdown_rx.clone();
        if is_shutdown(&shutdown_rx) {
            return Err(MeasureError::Cancelled);
        }

        let target = Arc::new(target);
        let start = Instant::now();
        let mut transfers = JoinSet::new();
        for _ in 0..self.width.get() {
            let probe = Arc::clone(&self.probe);
            let target = Arc::clone(&target);
            transfers.spawn(async move { probe.transfer(&target, direction).await });
        }

        let mut total_bytes: u64 = 0;
        loop {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    transfers.abort_all();
                    return Err(MeasureError::Cancelled);
                }
                joined = transfers.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok(bytes))) => total_bytes = total_bytes.saturating_add(bytes),
                    Some(Ok(Err(err))) => {
                        transfers.abort_all();
                        debug!("{} against {} failed: {}", direction.as_str(), target, err);
                        return Err(err.into());
                    }
                    Some(Err(source)) => {
                        transfers.abort_all();
                        return Err(MeasureError::TaskFailed { source });
                    }
                },
            }
        }
        let elapsed = start.elapsed().max(MIN_ELAPSED);

        if total_bytes == 0 {
            return Err(MeasureError::NoData);
        }
        let rate = bits_per_second(total_bytes, elapsed);
        debug!(
            "{} {}: {} bytes in {:?} over {} streams = {}",
            direction.as_str(),
            target,
            total_bytes,
            elapsed,
            self.width,
            rate
        );
        Ok(rate)
    }
}
