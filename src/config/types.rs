use serde::Deserialize;

/// Base URL of the movie database site
pub const DEFAULT_SITE_BASE_URL: &str = "https://www.csfd.cz";

/// Pagination set covering the top-300 ranking
pub const DEFAULT_TOP_LIST_URLS: [&str; 3] = [
    "https://www.csfd.cz/zebricky/filmy/nejlepsi/",
    "https://www.csfd.cz/zebricky/filmy/nejlepsi/?from=100",
    "https://www.csfd.cz/zebricky/filmy/nejlepsi/?from=200",
];

// 4 is conservative; the site usually tolerates 20.
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DATABASE_PATH: &str = "movies.db";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Main configuration structure for Top-Reel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum number of in-flight requests, applied to each crawl phase
    #[serde(rename = "max-connections")]
    pub max_connections: usize,

    /// Prefix joined with every relative movie link before fetching
    #[serde(rename = "site-base-url")]
    pub site_base_url: String,

    /// Ranking pages, in the order their links are crawled
    #[serde(rename = "top-list-urls")]
    pub top_list_urls: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            top_list_urls: DEFAULT_TOP_LIST_URLS.iter().map(|u| u.to_string()).collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

/// Read-only web view configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

/// Values that take precedence over the file and the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_connections: Option<usize>,
    pub database_path: Option<String>,
    pub bind_address: Option<String>,
}
