//! HTTP fetch capability
//!
//! The pipeline only ever needs "give me the body of this URL". Response
//! caching belongs to the host; `use_cache` is forwarded so a caching
//! implementation can honour it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{check_response, text_with_limit, FetchError, ResolveError};

#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Body of `url` as text.
    async fn open_url(&self, url: &str, use_cache: bool) -> Result<String, FetchError>;
}

/// reqwest-backed [`HttpFetch`] without a response cache.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(4)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn open_url(&self, url: &str, use_cache: bool) -> Result<String, FetchError> {
        debug!(url, use_cache, "open_url");
        let response = check_response(self.client.get(url).send().await?)?;
        text_with_limit(response).await
    }
}

/// Fetch `url` and deserialize the body as JSON.
pub async fn get_json<T: DeserializeOwned>(
    http: &dyn HttpFetch,
    url: &str,
    use_cache: bool,
) -> Result<T, ResolveError> {
    let body = http.open_url(url, use_cache).await?;
    serde_json::from_str(&body).map_err(Into::into)
}
