use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `server.port`
pub const PORT_ENV: &str = "PORT";

/// Loads and parses a configuration file from the given path
///
/// The `PORT` environment variable is applied before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use autohunter::config::load_config;
///
/// let config = load_config(Path::new("autohunter.toml")).unwrap();
/// println!("Listening on port: {}", config.server.port);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Builds the configuration from defaults plus environment overrides
///
/// Used when no configuration file is given.
pub fn default_config() -> Result<Config, ConfigError> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Loads `.env` from the working directory or one of its parents
///
/// Variables already set in the process environment win over the file.
/// Returns the path of the file that was loaded, if any.
pub fn load_env_file() -> Option<PathBuf> {
    report_env_file(dotenvy::dotenv())
}

/// Loads variables from a specific dotenv file
pub fn load_env_file_from(path: &Path) -> Option<PathBuf> {
    report_env_file(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn report_env_file(result: Result<PathBuf, dotenvy::Error>) -> Option<PathBuf> {
    match result {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to load environment file: {}", e);
            None
        }
    }
}

/// Applies overrides read from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_port_override(config, std::env::var(PORT_ENV).ok().as_deref())
}

/// Replaces `server.port` with a `PORT` value, if one is present
fn apply_port_override(config: &mut Config, value: Option<&str>) -> Result<(), ConfigError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };

    config.server.port = raw.parse().map_err(|_| ConfigError::InvalidEnv {
        name: PORT_ENV.to_string(),
        value: raw.to_string(),
    })?;

    Ok(())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This identifies which configuration a running process was started with.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
