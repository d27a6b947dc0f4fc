use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::engine::{Direction, ServerDescriptor, ServerDiscovery};
use crate::error::{DiscoveryError, TransportError};
use crate::http::RequestExecutor;

use super::discovery::{fetch_servers, with_query};

pub const OOKLA_DISCOVERY_URL: &str = "https://www.speedtest.net/api/js/servers";

/// Listed server URLs point at the upload handler.
const UPLOAD_HANDLER_SUFFIX: &str = "/upload.php";
/// 1000x1000 image served next to the upload handler, roughly 2 MB.
const DOWNLOAD_RESOURCE: &str = "random1000x1000.jpg";

/// speedtest.net server list.
#[derive(Clone)]
pub struct OoklaDiscovery {
    executor: Arc<dyn RequestExecutor>,
    base_url: Url,
    server_count: NonZeroUsize,
}

impl OoklaDiscovery {
    #[must_use]
    pub const fn new(
        executor: Arc<dyn RequestExecutor>,
        base_url: Url,
        server_count: NonZeroUsize,
    ) -> Self {
        Self {
            executor,
            base_url,
            server_count,
        }
    }

    /// `<base>?engine=js&limit=<count>`
    #[must_use]
    pub fn servers_url(&self) -> Url {
        let limit = self.server_count.to_string();
        with_query(&self.base_url, &[("engine", "js"), ("limit", limit.as_str())])
    }
}

#[async_trait]
impl ServerDiscovery for OoklaDiscovery {
    async fn discover(&self) -> Result<Vec<ServerDescriptor>, DiscoveryError> {
        fetch_servers(self.executor.as_ref(), self.servers_url()).await
    }

    fn transfer_target(
        &self,
        server: &ServerDescriptor,
        direction: Direction,
    ) -> Result<Url, TransportError> {
        let target = match direction {
            Direction::Download => {
                let root = server
                    .url
                    .strip_suffix(UPLOAD_HANDLER_SUFFIX)
                    .unwrap_or(&server.url);
                Url::parse(&format!("{}/{}", root, DOWNLOAD_RESOURCE))
            }
            Direction::Upload => Url::parse(&server.url),
        };
        target.map_err(|source| TransportError::BuildRequest { source })
    }
}
