use crate::config::types::{ArchiveConfig, Config, CrawlerConfig, ServerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_crawler_config(&config.crawler)?;
    validate_archive_config(&config.archive)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation("port must be non-zero".to_string()));
    }

    for origin in &config.cors_origins {
        validate_cors_origin(origin)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so only the upper bound is checked
    if config.max_depth > config.max_depth_limit {
        return Err(ConfigError::Validation(format!(
            "max_depth ({}) cannot exceed max_depth_limit ({})",
            config.max_depth, config.max_depth_limit
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "crawler request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "probe_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates archive configuration
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "archive request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "archive user_agent cannot be empty".to_string(),
        ));
    }

    if config.archive_name.is_empty()
        || !config
            .archive_name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "archive_name must be non-empty and contain only alphanumerics, '-' or '_', got '{}'",
            config.archive_name
        )));
    }

    Ok(())
}

/// Validates a CORS origin: `*` or an absolute http(s) origin
fn validate_cors_origin(origin: &str) -> Result<(), ConfigError> {
    if origin == "*" {
        return Ok(());
    }

    let url = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid CORS origin '{}': {}", origin, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "CORS origin '{}' must use http or https",
            origin
        )));
    }

    if url.path() != "/" || url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "CORS origin '{}' must not contain a path or query",
            origin
        )));
    }

    Ok(())
}
