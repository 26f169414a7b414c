use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable overriding `scraper.max-connections`
pub const ENV_MAX_CONNECTIONS: &str = "MAX_CONNECTIONS";

/// Environment variable overriding `output.database-path`
pub const ENV_DATABASE_PATH: &str = "DB_FILE";

/// Reads and parses a TOML file; keys it omits keep their defaults
fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Builds the effective configuration
///
/// Precedence, lowest first: defaults, the optional TOML file, the
/// `MAX_CONNECTIONS` / `DB_FILE` environment variables, then `overrides`.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    apply_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn apply_env(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
        config.scraper.max_connections = raw.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "{} must be a positive integer, got '{}'",
                ENV_MAX_CONNECTIONS, raw
            ))
        })?;
    }

    if let Some(path) = lookup(ENV_DATABASE_PATH) {
        config.output.database_path = path;
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(max) = overrides.max_connections {
        config.scraper.max_connections = max;
    }
    if let Some(path) = &overrides.database_path {
        config.output.database_path = path.clone();
    }
    if let Some(bind) = &overrides.bind_address {
        config.server.bind_address = bind.clone();
    }
}
