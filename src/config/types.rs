use serde::Deserialize;
use std::time::Duration;

/// Site the scraper targets when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://otakudesu.cloud/";

/// Browser user agents rotated across requests when none are configured
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the site; listing and search URLs are joined onto it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every single request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Proxy for all requests. When unset, HTTP_PROXY/HTTPS_PROXY apply.
    #[serde(default)]
    pub proxy: Option<String>,

    /// User agents rotated round-robin
    #[serde(rename = "user-agents", default)]
    pub user_agents: Vec<String>,
}

/// Enrichment fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Maximum number of detail fetches in flight during one enrichment call
    #[serde(rename = "max-connections", default = "default_max_connections")]
    pub max_connections: usize,

    /// Idle connections kept alive per host; defaults to 20% of max-connections
    #[serde(rename = "max-keepalive-connections", default)]
    pub max_keepalive_connections: Option<usize>,

    /// How long an idle keep-alive connection is retained (milliseconds)
    #[serde(rename = "keepalive-expiry-ms", default = "default_keepalive_expiry_ms")]
    pub keepalive_expiry_ms: u64,

    /// Let detail fields replace fields the listing already set
    #[serde(rename = "overwrite-existing", default)]
    pub overwrite_existing: bool,

    /// Fail the whole enrichment call with the first item error
    #[serde(rename = "raise-on-error", default)]
    pub raise_on_error: bool,
}

/// Listing traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Memoize visited listing pages in the client's page cache
    #[serde(rename = "use-cache", default = "default_use_cache")]
    pub use_cache: bool,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured user agents, falling back to the built-in list
    pub fn user_agents(&self) -> Vec<String> {
        if self.user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
        } else {
            self.user_agents.clone()
        }
    }
}

impl EnrichmentConfig {
    pub fn keepalive_connections(&self) -> usize {
        self.max_keepalive_connections
            .unwrap_or_else(|| (self.max_connections / 5).max(1))
    }

    pub fn keepalive_expiry(&self) -> Duration {
        Duration::from_millis(self.keepalive_expiry_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
            user_agents: Vec::new(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            max_keepalive_connections: None,
            keepalive_expiry_ms: default_keepalive_expiry_ms(),
            overwrite_existing: false,
            raise_on_error: false,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            use_cache: default_use_cache(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_connections() -> usize {
    100
}

fn default_keepalive_expiry_ms() -> u64 {
    5_000
}

fn default_use_cache() -> bool {
    true
}
