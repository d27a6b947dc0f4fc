use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::engine::{
    AverageAggregator, DEFAULT_UPLOAD_SIZE, DEFAULT_WORKLOAD, Direction, FanoutMeasurer,
    HttpTransferProbe, ServerDiscovery, ServerPolicy, TransferProbe,
};
use crate::error::{ConfigError, MeasureError};
use crate::http::RequestExecutor;
use crate::measurement::BitRate;
use crate::shutdown::ShutdownReceiver;

use super::netflix::NetflixDiscovery;
use super::ookla::OoklaDiscovery;
use super::report::SpeedReport;
use super::ProviderKind;

const DEFAULT_WORKLOAD_WIDTH: NonZeroUsize = match NonZeroUsize::new(DEFAULT_WORKLOAD) {
    Some(width) => width,
    None => NonZeroUsize::MIN,
};

/// Settings shared by every provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Servers to request from discovery; `0` is treated as `1`.
    pub server_count: usize,
    pub token: Option<String>,
    pub workload: NonZeroUsize,
    pub upload_size: usize,
    pub server_policy: ServerPolicy,
    /// Replaces the provider's discovery endpoint.
    pub discovery_url: Option<Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_count: 1,
            token: None,
            workload: DEFAULT_WORKLOAD_WIDTH,
            upload_size: DEFAULT_UPLOAD_SIZE,
            server_policy: ServerPolicy::default(),
            discovery_url: None,
        }
    }
}

/// Download and upload throughput measurement.
#[async_trait]
pub trait Measurer: Send + Sync {
    /// # Errors
    ///
    /// Returns the first discovery or transfer failure, or a cancellation.
    async fn measure_download(&self, shutdown_rx: &ShutdownReceiver)
    -> Result<BitRate, MeasureError>;

    /// # Errors
    ///
    /// Returns the first discovery or transfer failure, or a cancellation.
    async fn measure_upload(&self, shutdown_rx: &ShutdownReceiver)
    -> Result<BitRate, MeasureError>;

    /// Measures download, then upload.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either direction.
    async fn measure(&self, shutdown_rx: &ShutdownReceiver) -> Result<SpeedReport, MeasureError>;
}

/// Provider-bound measurer.
#[derive(Clone)]
pub struct SpeedClient {
    provider: ProviderKind,
    server_count: NonZeroUsize,
    discovery: Arc<dyn ServerDiscovery>,
    workload: NonZeroUsize,
    aggregator: AverageAggregator,
}

impl SpeedClient {
    fn new(
        provider: ProviderKind,
        server_count: NonZeroUsize,
        discovery: Arc<dyn ServerDiscovery>,
        probe: Arc<dyn TransferProbe>,
        config: &ClientConfig,
    ) -> Self {
        let fanout = FanoutMeasurer::new(probe, config.workload);
        Self {
            provider,
            server_count,
            discovery,
            workload: config.workload,
            aggregator: AverageAggregator::new(fanout, config.server_policy),
        }
    }

    /// Swaps the transfer probe, keeping discovery and engine settings.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn TransferProbe>) -> Self {
        let policy = self.aggregator.policy();
        self.aggregator = AverageAggregator::new(FanoutMeasurer::new(probe, self.workload), policy);
        self
    }

    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        self.provider
    }

    #[must_use]
    pub const fn server_count(&self) -> usize {
        self.server_count.get()
    }

    async fn measure_direction(
        &self,
        direction: Direction,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<BitRate, MeasureError> {
        let rate = self
            .aggregator
            .measure_all(self.discovery.as_ref(), direction, shutdown_rx)
            .await?;
        info!(
            "{} {}: {}",
            self.provider.as_str(),
            direction.as_str(),
            rate.mbps_str()
        );
        Ok(rate)
    }
}

#[async_trait]
impl Measurer for SpeedClient {
    async fn measure_download(
        &self,
        shutdown_rx: &ShutdownReceiver,
    ) -> Result<BitRate, MeasureError> {
        self.measure_direction(Direction::Download, shutdown_rx)
            .await
    }

    async fn measure_upload(&self, shutdown_rx: &ShutdownReceiver) -> Result<BitRate, MeasureError> {
        self.measure_direction(Direction::Upload, shutdown_rx).await
    }

    async fn measure(&self, shutdown_rx: &ShutdownReceiver) -> Result<SpeedReport, MeasureError> {
        let mut report = SpeedReport::new(self.provider, self.server_count());
        report.download = Some(self.measure_download(shutdown_rx).await?);
        report.upload = Some(self.measure_upload(shutdown_rx).await?);
        Ok(report)
    }
}

/// Binds `provider` to `executor` with the given settings.
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] for `netflix` without a token, or
/// [`ConfigError::InvalidDiscoveryUrl`] when the discovery endpoint is not a
/// valid URL.
pub fn build_client(
    provider: ProviderKind,
    config: ClientConfig,
    executor: Arc<dyn RequestExecutor>,
) -> Result<SpeedClient, ConfigError> {
    let server_count = NonZeroUsize::new(config.server_count).unwrap_or(NonZeroUsize::MIN);
    let base_url = match config.discovery_url.clone() {
        Some(url) => url,
        None => {
            let raw = provider.default_discovery_url();
            Url::parse(raw).map_err(|source| ConfigError::InvalidDiscoveryUrl {
                url: raw.to_owned(),
                source,
            })?
        }
    };

    let discovery: Arc<dyn ServerDiscovery> = match provider {
        ProviderKind::Ookla => Arc::new(OoklaDiscovery::new(
            Arc::clone(&executor),
            base_url,
            server_count,
        )),
        ProviderKind::Netflix => {
            let token = config
                .token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or(ConfigError::MissingToken {
                    provider: "fast.com",
                })?;
            Arc::new(NetflixDiscovery::new(
                Arc::clone(&executor),
                base_url,
                token.to_owned(),
                server_count,
            ))
        }
    };

    let probe = Arc::new(HttpTransferProbe::new(executor, config.upload_size));
    Ok(SpeedClient::new(
        provider,
        server_count,
        discovery,
        probe,
        &config,
    ))
}
