//! HTTP transport abstraction so searches can run against canned bodies in tests.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::{ExploreRequest, ExploreResponse, PlacesError, Restaurant, Result};

/// Something that can perform a GET and hand back the response body.
///
/// Implementations must turn non-success statuses into
/// [`PlacesError::Status`]; callers only ever see a body for a 2xx response.
pub trait PlacesTransport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Default request timeout for the places API.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PlacesTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        // reqwest errors carry the full URL, key included
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status {
                status: status.as_u16(),
                endpoint: redacted(url),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        Ok(body.to_vec())
    }
}

/// Issue an explore request and decode its items, in upstream order.
#[instrument(name = "Fetch explore", skip_all, level = "debug", fields(lat = request.latitude, lon = request.longitude))]
pub async fn fetch_explore<T: PlacesTransport>(
    transport: &T,
    request: &ExploreRequest,
) -> Result<Vec<Restaurant>> {
    let url = request.url()?;
    debug!(endpoint = %redacted(&url), "Requesting places");

    let body = transport.get(&url).await?;
    let items = ExploreResponse::from_slice(&body)?.into_items();

    debug!(count = items.len(), "Decoded places");
    Ok(items)
}

/// Endpoint without its query string, so the API key never reaches logs or alerts.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
