use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DiscoveryError, TransportError};

use super::probe::Direction;

/// Probe server as returned by a discovery endpoint; only `url` is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerDescriptor {
    pub url: String,
}

/// Source of probe servers and of the per-direction transfer URL for each.
#[async_trait]
pub trait ServerDiscovery: Send + Sync {
    /// Fetches a fresh server list.
    ///
    /// # Errors
    ///
    /// Returns an error when the list cannot be fetched or decoded.
    async fn discover(&self) -> Result<Vec<ServerDescriptor>, DiscoveryError>;

    /// Resolves the URL a probe transfers against.
    ///
    /// # Errors
    ///
    /// Returns an error when the server URL cannot be turned into a target.
    fn transfer_target(
        &self,
        server: &ServerDescriptor,
        direction: Direction,
    ) -> Result<Url, TransportError>;
}
