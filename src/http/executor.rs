use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use url::Url;

use crate::error::HttpError;

/// Streamed response body; each item is one received chunk.
pub type BodyStream = BoxStream<'static, Result<Bytes, HttpError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Transport-agnostic description of one request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl RequestSpec {
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub const fn post(url: Url, body: Bytes) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

pub struct ExecutorResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl ExecutorResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl std::fmt::Debug for ExecutorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Executes requests on behalf of the measurement engine.
///
/// The engine only ever builds [`RequestSpec`]s; the host decides how they hit
/// the network (timeouts, TLS, proxies).
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends `request` and returns the response head with a body stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or no response arrives.
    async fn execute(&self, request: RequestSpec) -> Result<ExecutorResponse, HttpError>;
}

/// Reads the body to the end, discarding it, and returns the byte count.
///
/// # Errors
///
/// Returns the first chunk error.
pub async fn drain_body(mut body: BodyStream) -> Result<u64, HttpError> {
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = body.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// Reads the whole body into memory.
///
/// # Errors
///
/// Returns the first chunk error.
pub async fn collect_body(mut body: BodyStream) -> Result<Vec<u8>, HttpError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
