/*
[INPUT]:  HTTP configuration (service URL, route prefix, timeouts, retry policy)
[OUTPUT]: Configured reqwest client ready for Jobmon API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{JobmonError, Result, RetryPolicy};

/// Version reported to the server on every request
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default route prefix for the v2 API
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/v2";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub route_prefix: String,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(10),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Main HTTP client for the Jobmon service
#[derive(Debug, Clone)]
pub struct JobmonClient {
    http_client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl JobmonClient {
    /// Create a new client with default configuration
    pub fn new(service_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), service_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, service_url: &str) -> Result<Self> {
        let service_url = service_url.trim();
        if service_url.is_empty() {
            return Err(JobmonError::Config("service_url must not be empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url(service_url, &config.route_prefix)?,
            retry: config.retry,
        })
    }

    /// Base URL every route is joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for a route relative to the prefix
    fn route_url(&self, route: &str) -> Result<Url> {
        Ok(self.base_url.join(route.trim_start_matches('/'))?)
    }

    /// GET `route` with the retry policy and decode the JSON body
    pub(crate) async fn get_json<T>(&self, route: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.route_url(route)?;
        self.retry
            .run(route, move || self.get_once(url.clone(), route, params))
            .await
    }

    async fn get_once<T>(&self, url: Url, route: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%url, ?params, "GET");
        let response = self
            .http_client
            .get(url)
            .query(params)
            .query(&[("client_jobmon_version", CLIENT_VERSION)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content = response.text().await?;
        if let Some(err) = JobmonError::from_status(status, route, content.as_str()) {
            return Err(err);
        }
        Ok(serde_json::from_str(&content)?)
    }
}

fn base_url(service_url: &str, route_prefix: &str) -> Result<Url> {
    let prefix = route_prefix.trim_matches('/');
    let root = service_url.trim_end_matches('/');
    let raw = if prefix.is_empty() {
        format!("{root}/")
    } else {
        format!("{root}/{prefix}/")
    };
    Ok(Url::parse(&raw)?)
}
