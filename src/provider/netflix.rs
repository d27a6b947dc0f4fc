use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::engine::{Direction, ServerDescriptor, ServerDiscovery};
use crate::error::{DiscoveryError, TransportError};
use crate::http::RequestExecutor;

use super::discovery::{fetch_servers, with_query};

pub const NETFLIX_DISCOVERY_URL: &str = "https://api.fast.com/netflix/speedtest";

/// fast.com server list. Listed URLs are used as is for both directions.
#[derive(Clone)]
pub struct NetflixDiscovery {
    executor: Arc<dyn RequestExecutor>,
    base_url: Url,
    token: String,
    server_count: NonZeroUsize,
}

impl NetflixDiscovery {
    #[must_use]
    pub const fn new(
        executor: Arc<dyn RequestExecutor>,
        base_url: Url,
        token: String,
        server_count: NonZeroUsize,
    ) -> Self {
        Self {
            executor,
            base_url,
            token,
            server_count,
        }
    }

    /// `<base>?https=true&token=<token>&urlCount=<count>`
    #[must_use]
    pub fn servers_url(&self) -> Url {
        let count = self.server_count.to_string();
        with_query(
            &self.base_url,
            &[("https", "true"), ("token", self.token.as_str()), ("urlCount", count.as_str())],
        )
    }
}

#[async_trait]
impl ServerDiscovery for NetflixDiscovery {
    async fn discover(&self) -> Result<Vec<ServerDescriptor>, DiscoveryError> {
        fetch_servers(self.executor.as_ref(), self.servers_url()).await
    }

    fn transfer_target(
        &self,
        server: &ServerDescriptor,
        _direction: Direction,
    ) -> Result<Url, TransportError> {
        Url::parse(&server.url).map_err(|source| TransportError::BuildRequest { source })
    }
}
