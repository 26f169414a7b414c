//! Top-Reel: a movie ranking scraper
//!
//! This crate collects a ranked list of movies and their cast from a public
//! movie database, persists the result to SQLite and serves a read-only,
//! searchable view of it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod server;
pub mod storage;
pub mod text;

use thiserror::Error;

/// Main error type for Top-Reel operations
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: TransportError },

    #[error("Parsing error for {url}: {source}")]
    Parse { url: String, source: ParsingError },

    #[error("Invalid movie link {url}: {source}")]
    InvalidLink {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelError {
    /// The URL or link whose fetch, parse or resolution aborted the crawl, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. }
            | Self::Parse { url, .. }
            | Self::InvalidLink { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Failure while fetching a page over HTTP
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("connection limiter closed")]
    LimiterClosed,
}

/// A page whose structure cannot be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParsingError(pub String);

impl ParsingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Top-Reel operations
pub type Result<T> = std::result::Result<T, ReelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape_and_save, Actor, FetchProgress, MoviePage, Scraper};
pub use storage::{MovieStorage, SqliteMovieStore};
pub use text::normalize;
