//! Configuration module for Hub-Sift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hub_sift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("search.toml")).unwrap();
//! println!("Searching {} for {:?}", config.search.resource_type, config.search.keywords);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    HttpConfig, ScraperConfig, SearchConfig, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_FETCHES,
    DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::validate;
