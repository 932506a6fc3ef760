//! Configuration module for AutoHunter
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default, so a file is optional; the `PORT`
//! environment variable overrides the listening port either way.
//!
//! # Example
//!
//! ```no_run
//! use autohunter::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("autohunter.toml")).unwrap();
//! println!("Default scan depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, CrawlerConfig, ServerConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, default_config, load_config, load_config_with_hash,
    load_env_file, load_env_file_from, PORT_ENV,
};
