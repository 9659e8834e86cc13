use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::output::Serializer;
use crate::record::RecordKind;

/// Main configuration structure for bbs-archive
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Forum root, e.g. `https://www.youbbs.org`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Root directory that receives `<kind>/<file>` outputs
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Output format
    #[serde(default)]
    pub serializer: Serializer,

    /// Record kinds to walk, in order
    #[serde(default = "default_kinds")]
    pub kinds: Vec<RecordKind>,

    /// First ID to visit (inclusive)
    #[serde(rename = "start-id", default = "default_start_id")]
    pub start_id: u64,

    /// Last ID to visit (inclusive); unbounded when absent
    #[serde(rename = "max-id", default)]
    pub max_id: Option<u64>,

    /// Maximum number of pipelines in flight per batch
    #[serde(rename = "max-concurrent", default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Config {
    /// Creates a configuration with every optional setting at its default
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            serializer: Serializer::default(),
            kinds: default_kinds(),
            start_id: default_start_id(),
            max_id: None,
            max_concurrent: default_max_concurrent(),
            http: HttpConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Session cookie sent with every request, for boards that hide pages
    /// from anonymous visitors
    #[serde(default)]
    pub cookie: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            cookie: None,
        }
    }
}

/// Page extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// UTC offset the forum prints its dates in, e.g. `+08:00`
    #[serde(rename = "utc-offset", default = "default_utc_offset")]
    pub utc_offset: String,
}

impl ExtractConfig {
    /// Parses the configured UTC offset
    ///
    /// Returns None if the value is not of the form `+HH:MM` / `-HH:MM`.
    pub fn offset(&self) -> Option<FixedOffset> {
        let probe = format!("2000-01-01 00:00 {}", self.utc_offset.trim());
        DateTime::parse_from_str(&probe, "%Y-%m-%d %H:%M %:z")
            .ok()
            .map(|dt| *dt.offset())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
        }
    }
}

fn default_kinds() -> Vec<RecordKind> {
    RecordKind::ALL.to_vec()
}

fn default_start_id() -> u64 {
    1
}

fn default_max_concurrent() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("bbs-archive/{}", env!("CARGO_PKG_VERSION"))
}

fn default_utc_offset() -> String {
    "+08:00".to_string()
}
