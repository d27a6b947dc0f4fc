use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info};
use url::Url;

use crate::error::MeasureError;
use crate::measurement::BitRate;
use crate::shutdown::{ShutdownReceiver, is_shutdown, wait_for_shutdown};

use super::fanout::FanoutMeasurer;
use super::probe::Direction;
use super::servers::ServerDiscovery;

/// How the servers of one measurement are walked.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerPolicy {
    /// One fan-out per server, all at once.
    #[default]
    Concurrent,
    /// One server after the other, in discovery order.
    Sequential,
}

/// Averages per-server fan-out rates over a fresh server list.
#[derive(Clone)]
pub struct AverageAggregator {
    fanout: FanoutMeasurer,
    policy: ServerPolicy,
}

impl AverageAggregator {
    #[must_use]
    pub const fn new(fanout: FanoutMeasurer, policy: ServerPolicy) -> Self {
        Self { fanout, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> ServerPolicy {
        self.policy
    }

    /// Discovers servers and returns the mean of their rates.
    ///
    /// # Errors
    ///
    /// Returns the discovery error, [`MeasureError::NoServers`] for an empty
    /// list, the first per-server error unchanged, or
    /// [`MeasureError::Cancelled`].
    pub async fn measure_all(
        &self,
        discovery: &dyn ServerDiscovery,
        direction: Direction,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<BitRate, MeasureError> {
        let mut shutdown_wait = shutdown_rx.clone();
        if is_shutdown(&shutdown_wait) {
            return Err(MeasureError::Cancelled);
        }

        let servers = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut shutdown_wait) => return Err(MeasureError::Cancelled),
            servers = discovery.discover() => servers?,
        };
        if servers.is_empty() {
            return Err(MeasureError::NoServers);
        }
        info!(
            "Measuring {} against {} server(s) x {} streams",
            direction.as_str(),
            servers.len(),
            self.fanout.width()
        );

        let mut targets = Vec::with_capacity(servers.len());
        for server in &servers {
            targets.push(discovery.transfer_target(server, direction)?);
        }

        let rates = match self.policy {
            ServerPolicy::Concurrent => {
                self.measure_concurrent(targets, direction, shutdown_rx)
                    .await?
            }
            ServerPolicy::Sequential => {
                self.measure_sequential(targets, direction, shutdown_rx)
                    .await?
            }
        };

        BitRate::average(&rates).ok_or(MeasureError::NoServers)
    }

    async fn measure_sequential(
        &self,
        targets: Vec<Url>,
        direction: Direction,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<Vec<BitRate>, MeasureError> {
        let mut rates = Vec::with_capacity(targets.len());
        for target in targets {
            let rate = self.fanout.measure(target, direction, shutdown_rx).await?;
            rates.push(rate);
        }
        Ok(rates)
    }

    async fn measure_concurrent(
        &self,
        targets: Vec<Url>,
        direction: Direction,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<Vec<BitRate>, MeasureError> {
        let mut shutdown_wait = shutdown_rx.clone();
        let mut rates = Vec::with_capacity(targets.len());
        let mut servers = JoinSet::new();
        for target in targets {
            let fanout = self.fanout.clone();
            let shutdown_rx = shutdown_rx.clone();
            servers.spawn(async move { fanout.measure(target, direction, &shutdown_rx).await });
        }

        loop {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_wait) => {
                    servers.abort_all();
                    return Err(MeasureError::Cancelled);
                }
                joined = servers.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok(rate))) => rates.push(rate),
                    Some(Ok(Err(err))) => {
                        servers.abort_all();
                        debug!("Aborting remaining servers after failure: {}", err);
                        return Err(err);
                    }
                    Some(Err(source)) => {
                        servers.abort_all();
                        return Err(MeasureError::TaskFailed { source });
                    }
                },
            }
        }
        Ok(rates)
    }
}
