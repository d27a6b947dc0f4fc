use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Method};
use tracing::{debug, error};

use crate::error::HttpError;

use super::executor::{ExecutorResponse, HttpMethod, RequestExecutor, RequestSpec};

/// Settings for the network executor.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

/// [`RequestExecutor`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Builds the network executor used by the CLI.
///
/// # Errors
///
/// Returns an error when the underlying HTTP client cannot be built.
pub fn build_executor(options: &ClientOptions) -> Result<ReqwestExecutor, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(options.request_timeout)
        .connect_timeout(options.connect_timeout);

    if let Some(user_agent) = options.user_agent.as_deref() {
        client_builder = client_builder.user_agent(user_agent);
    }

    let client = match client_builder.build() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return Err(HttpError::BuildClient {
                message: e.to_string(),
            });
        }
    };

    Ok(ReqwestExecutor::from_client(client))
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: RequestSpec) -> Result<ExecutorResponse, HttpError> {
        debug!("{} {}", request.method.as_str(), request.url);
        let mut request_builder = self
            .client
            .request(to_reqwest_method(request.method), request.url);

        for (key, value) in &request.headers {
            request_builder = request_builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            request_builder = request_builder.body(body);
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(HttpError::from))
            .boxed();

        Ok(ExecutorResponse { status, body })
    }
}
