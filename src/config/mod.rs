//! Configuration module for Top-Reel
//!
//! This module handles loading, layering and validating configuration.
//! Values come from built-in defaults, an optional TOML file, the
//! environment and finally command-line overrides.
//!
//! # Example
//!
//! ```no_run
//! use top_reel::config::{resolve_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("top-reel.toml")), &ConfigOverrides::default()).unwrap();
//! println!("Scraping with {} connections", config.scraper.max_connections);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigOverrides, OutputConfig, ScraperConfig, ServerConfig, DEFAULT_SITE_BASE_URL,
    DEFAULT_TOP_LIST_URLS,
};

// Re-export parser functions
pub use parser::{resolve_config, ENV_DATABASE_PATH, ENV_MAX_CONNECTIONS};

// Re-export validation for callers that build a Config by hand
pub use validation::{validate, validate_scraper_config};
