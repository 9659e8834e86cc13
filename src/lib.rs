//! bbs-archive: an ID-range archiver for youBBS-style forums
//!
//! This crate walks the dense numeric ID spaces of a forum (articles, users,
//! categories), turns every page it finds into a typed record and writes one
//! file per record in the chosen output format.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod stages;
pub mod storage;

use thiserror::Error;

/// Main error type for bbs-archive operations
///
/// Only process-level failures end up here. Failures of a single page are
/// contained in [`crawler::PipelineError`] and never abort a run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output directory {path} is not usable: {source}")]
    OutputDir {
        path: String,
        source: std::io::Error,
    },
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

    #[error("Unknown {field} value: '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// Result type alias for bbs-archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, PipelineOutcome};
pub use output::{RecordSerializer, RunSummary, Serializer};
pub use record::{Article, Category, Comment, PageRecord, RecordKind, User};
