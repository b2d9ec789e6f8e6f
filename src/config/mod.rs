//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use otakudesu_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("otakudesu.toml")).unwrap();
//! println!("Requests time out after {}s", config.client.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, EnrichmentConfig, PaginationConfig, DEFAULT_BASE_URL,
    DEFAULT_USER_AGENTS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
