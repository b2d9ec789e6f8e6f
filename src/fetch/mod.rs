//! HTTP fetch client
//!
//! This module handles all HTTP requests made by the scraper, including:
//! - Building one pooled HTTP client shared by walkers and enrichment calls
//! - User-agent rotation and per-request header/timeout overrides
//! - Error classification into [`FetchError`]

mod user_agent;

pub use user_agent::UserAgentPool;

use crate::config::Config;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Per-request overrides
///
/// Custom `headers` replace the rotated user agent entirely, the way a caller
/// supplying its own header set expects.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Option<HeaderMap>,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options carrying only query parameters
    pub fn with_query<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }
}

/// Pooled fetch client
///
/// Cloning is cheap; all clones share one connection pool and one
/// user-agent rotation.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agents: UserAgentPool,
    timeout: Duration,
}

/// Builds the pooled HTTP client from configuration
///
/// Keep-alive limits come from the enrichment section because enrichment is
/// the only place many requests share the pool at once.
///
/// # Example
///
/// ```no_run
/// use otakudesu_scraper::config::Config;
/// use otakudesu_scraper::fetch::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(config.client.timeout())
        .connect_timeout(config.client.timeout())
        .pool_max_idle_per_host(config.enrichment.keepalive_connections())
        .pool_idle_timeout(config.enrichment.keepalive_expiry())
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.client.proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            user_agents: UserAgentPool::new(config.client.user_agents()),
            timeout: config.client.timeout(),
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client, user_agents: UserAgentPool, timeout: Duration) -> Self {
        Self {
            client,
            user_agents,
            timeout,
        }
    }

    /// Fetches a page body with default options
    pub async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        self.fetch_with(url, &RequestOptions::default()).await
    }

    /// Fetches a page body
    ///
    /// Any non-2xx status is a transport failure; the body of an error page
    /// is never handed to an extractor.
    pub async fn fetch_with(&self, url: &str, options: &RequestOptions) -> FetchResult<String> {
        let mut request = self
            .client
            .get(url)
            .timeout(options.timeout.unwrap_or(self.timeout));

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }

        request = match &options.headers {
            Some(headers) => request.headers(headers.clone()),
            None => {
                let agent = options
                    .user_agent
                    .as_deref()
                    .or_else(|| self.user_agents.next_agent());
                match agent {
                    Some(agent) => request.header(USER_AGENT, agent),
                    None => request,
                }
            }
        };

        tracing::debug!("GET {}", url);

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

/// Maps a reqwest send error to the transport failure it represents
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else if error.is_builder() {
        FetchError::InvalidUrl {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
