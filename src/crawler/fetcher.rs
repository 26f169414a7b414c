//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - Plain GET requests returning the body text
//! - Error classification (status, timeout, connection, other)
//!
//! There is no retry logic; a failed fetch is reported to the caller as is.

use crate::config::ScraperConfig;
use crate::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Something that can return the body of a page
///
/// The orchestrator wraps every call in its connection limiter.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns the full body text
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// No custom headers, no cookies; only the timeouts and compression are set.
///
/// # Example
///
/// ```no_run
/// use top_reel::config::ScraperConfig;
/// use top_reel::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageSource`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

/// Maps a reqwest failure onto the transport taxonomy
fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Network(error)
    }
}
