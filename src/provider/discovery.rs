use tracing::debug;
use url::Url;

use crate::engine::ServerDescriptor;
use crate::error::DiscoveryError;
use crate::http::{RequestExecutor, RequestSpec, collect_body};

/// Copies `base` with `pairs` appended to its query.
///
/// Keys in `pairs` replace any value `base` already carries for them; other
/// keys on an overridden discovery URL are kept in front.
pub(super) fn with_query(base: &Url, pairs: &[(&str, &str)]) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !pairs.iter().any(|(owned, _)| &**key == *owned))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(kept)
        .extend_pairs(pairs.iter().copied());
    url
}

/// GETs `url` and decodes the JSON array of servers it returns.
pub(super) async fn fetch_servers(
    executor: &dyn RequestExecutor,
    url: Url,
) -> Result<Vec<ServerDescriptor>, DiscoveryError> {
    // The query may carry a token, so only host and path are logged.
    debug!(
        "Fetching server list from {}{}",
        url.host_str().unwrap_or_default(),
        url.path()
    );
    let response = executor
        .execute(RequestSpec::get(url))
        .await
        .map_err(|source| DiscoveryError::Send { source })?;
    if !response.is_success() {
        return Err(DiscoveryError::Status {
            status: response.status,
        });
    }

    let body = collect_body(response.body)
        .await
        .map_err(|source| DiscoveryError::ReadBody { source })?;
    let servers: Vec<ServerDescriptor> =
        serde_json::from_slice(&body).map_err(|source| DiscoveryError::Decode { source })?;
    debug!("Discovery returned {} server(s)", servers.len());
    Ok(servers)
}
