//! Configuration module for bbs-archive
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bbs_archive::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archive.toml")).unwrap();
//! println!("Archiving {} into {}", config.base_url, config.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractConfig, HttpConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::validate;
