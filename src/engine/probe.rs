use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::TransportError;
use crate::http::{RequestExecutor, RequestSpec, drain_body};

use super::payload::random_string;

/// Size of the generated upload payload, in characters.
pub const DEFAULT_UPLOAD_SIZE: usize = 100_000;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const UPLOAD_FIELD: &str = "content";

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Download,
    Upload,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Download => "download",
            Direction::Upload => "upload",
        }
    }
}

/// One timed transfer against one target; returns the bytes moved.
#[async_trait]
pub trait TransferProbe: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the transfer fails.
    async fn transfer(&self, target: &Url, direction: Direction) -> Result<u64, TransportError>;
}

/// Network probe issuing requests through a [`RequestExecutor`].
#[derive(Clone)]
pub struct HttpTransferProbe {
    executor: Arc<dyn RequestExecutor>,
    upload_size: usize,
}

impl HttpTransferProbe {
    #[must_use]
    pub const fn new(executor: Arc<dyn RequestExecutor>, upload_size: usize) -> Self {
        Self {
            executor,
            upload_size,
        }
    }

    async fn download(&self, target: &Url) -> Result<u64, TransportError> {
        let response = self
            .executor
            .execute(RequestSpec::get(target.clone()))
            .await
            .map_err(|source| TransportError::Send { source })?;
        if !response.is_success() {
            warn!("{} answered download with HTTP {}", target, response.status);
        }

        // The received byte count is the measurement, so a broken body fails it.
        let bytes = drain_body(response.body)
            .await
            .map_err(|source| TransportError::BodyRead { source })?;
        debug!("downloaded {} bytes from {}", bytes, target);
        Ok(bytes)
    }

    async fn upload(&self, target: &Url) -> Result<u64, TransportError> {
        let payload = random_string(self.upload_size);
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(UPLOAD_FIELD, &payload)
            .finish();
        let request = RequestSpec::post(target.clone(), Bytes::from(body))
            .header("Content-Type", FORM_CONTENT_TYPE);

        let response = self
            .executor
            .execute(request)
            .await
            .map_err(|source| TransportError::Send { source })?;
        if !response.is_success() {
            warn!("{} answered upload with HTTP {}", target, response.status);
        }

        // Bytes sent are known already; the reply body is only drained.
        if let Err(err) = drain_body(response.body).await {
            warn!("failed to copy response body: {}", err);
        }
        Ok(u64::try_from(self.upload_size).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl TransferProbe for HttpTransferProbe {
    async fn transfer(&self, target: &Url, direction: Direction) -> Result<u64, TransportError> {
        match direction {
            Direction::Download => self.download(target).await,
            Direction::Upload => self.upload(target).await,
        }
    }
}
