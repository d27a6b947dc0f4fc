use thiserror::Error;

use super::HttpError;

/// Failure while fetching the probe server list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to send request: {source}")]
    Send {
        #[source]
        source: HttpError,
    },
    #[error("server list request returned HTTP {status}")]
    Status { status: u16 },
    #[error("failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: HttpError,
    },
    #[error("failed to json unmarshal response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single timed transfer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to create request: {source}")]
    BuildRequest {
        #[source]
        source: url::ParseError,
    },
    #[error("failed to send request: {source}")]
    Send {
        #[source]
        source: HttpError,
    },
    #[error("failed to copy response body: {source}")]
    BodyRead {
        #[source]
        source: HttpError,
    },
}

/// Failure of a whole measurement call.
///
/// Discovery and transport failures are forwarded without an extra prefix so
/// the message that reaches the caller is the one produced where the failure
/// happened.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no probe servers were returned by the discovery endpoint")]
    NoServers,
    #[error("transfers completed without moving any data")]
    NoData,
    #[error("measurement cancelled")]
    Cancelled,
    #[error("transfer task failed: {source}")]
    TaskFailed {
        #[source]
        source: tokio::task::JoinError,
    },
}
