use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{DiscoveryError, HttpError, TransportError};

use super::probe::{Direction, TransferProbe};
use super::servers::{ServerDescriptor, ServerDiscovery};

/// Probe that waits `delay` and reports a fixed byte count.
#[derive(Debug, Default)]
pub(crate) struct FixedProbe {
    bytes: u64,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    targets: Mutex<Vec<String>>,
}

impl FixedProbe {
    pub(crate) fn new(bytes: u64, delay: Duration) -> Self {
        Self {
            bytes,
            delay,
            ..Self::default()
        }
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn targets(&self) -> Vec<String> {
        self.targets
            .lock()
            .map(|targets| targets.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TransferProbe for FixedProbe {
    async fn transfer(&self, target: &Url, _direction: Direction) -> Result<u64, TransportError> {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push(target.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.bytes)
    }
}

/// Probe whose first call fails after `fail_after`; later calls hang for
/// `straggler_delay` and count their completions.
#[derive(Debug)]
pub(crate) struct FailFirstProbe {
    message: &'static str,
    fail_after: Duration,
    straggler_delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl FailFirstProbe {
    pub(crate) const fn new(
        message: &'static str,
        fail_after: Duration,
        straggler_delay: Duration,
    ) -> Self {
        Self {
            message,
            fail_after,
            straggler_delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferProbe for FailFirstProbe {
    async fn transfer(&self, _target: &Url, _direction: Direction) -> Result<u64, TransportError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.fail_after).await;
            return Err(TransportError::Send {
                source: HttpError::request(self.message),
            });
        }
        tokio::time::sleep(self.straggler_delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}

/// Probe failing for one host and succeeding instantly elsewhere.
#[derive(Debug)]
pub(crate) struct HostFailingProbe {
    pub(crate) failing_host: &'static str,
    pub(crate) message: &'static str,
}

#[async_trait]
impl TransferProbe for HostFailingProbe {
    async fn transfer(&self, target: &Url, _direction: Direction) -> Result<u64, TransportError> {
        if target.host_str() == Some(self.failing_host) {
            return Err(TransportError::Send {
                source: HttpError::request(self.message),
            });
        }
        Ok(1_000)
    }
}

/// Discovery returning a fixed list (or a fixed failure).
#[derive(Debug, Default)]
pub(crate) struct StaticDiscovery {
    servers: Vec<ServerDescriptor>,
    failure: Option<&'static str>,
    calls: AtomicUsize,
}

impl StaticDiscovery {
    pub(crate) fn with_urls(urls: &[&str]) -> Self {
        Self {
            servers: urls
                .iter()
                .map(|url| ServerDescriptor {
                    url: (*url).to_owned(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing(message: &'static str) -> Self {
        Self {
            failure: Some(message),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServerDiscovery for StaticDiscovery {
    async fn discover(&self) -> Result<Vec<ServerDescriptor>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure {
            return Err(DiscoveryError::Send {
                source: HttpError::request(message),
            });
        }
        Ok(self.servers.clone())
    }

    fn transfer_target(
        &self,
        server: &ServerDescriptor,
        _direction: Direction,
    ) -> Result<Url, TransportError> {
        Url::parse(&server.url).map_err(|source| TransportError::BuildRequest { source })
    }
}
