use std::future::Future;
use std::time::Instant;

use tracing::debug;

use crate::error::FetchError;
use crate::sources::Site;

/// Source of raw page HTML for a site's numeric college id.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, site: Site, id: u64) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain GET against the live sites.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(HttpFetcher { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, site: Site, id: u64) -> Result<String, FetchError> {
        let url = site.page_url(id);
        let start = Instant::now();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!(
            %site,
            id,
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "fetched page"
        );
        Ok(body)
    }
}
