use crate::config::types::{Config, OutputConfig, ScraperConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawl configuration
pub fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_connections < 1 || config.max_connections > 100 {
        return Err(ConfigError::Validation(format!(
            "max_connections must be between 1 and 100, got {}",
            config.max_connections
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    validate_http_url("site_base_url", &config.site_base_url)?;

    if config.top_list_urls.is_empty() {
        return Err(ConfigError::Validation(
            "top_list_urls must contain at least one URL".to_string(),
        ));
    }

    for url in &config.top_list_urls {
        validate_http_url("top_list_urls", url)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid bind_address '{}': {}",
            config.bind_address, e
        ))
    })?;
    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
