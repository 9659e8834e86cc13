//! Output module for encoding records and reporting runs
//!
//! This module handles:
//! - The serializer contract every output format implements
//! - The built-in formats (JSON, YAML, Markdown with front matter)
//! - Per-run statistics

mod json;
pub mod markdown;
pub mod stats;
mod traits;
mod yaml;

pub use json::JsonSerializer;
pub use markdown::{html_to_markdown, MarkdownSerializer};
pub use stats::{print_summary, KindSummary, RunSummary};
pub use traits::{RecordSerializer, SerializeError, SerializeResult};
pub use yaml::YamlSerializer;

use crate::record::PageRecord;
use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The built-in output formats
///
/// This is the value selected in the configuration. Formats outside this set
/// plug into the coordinator through [`RecordSerializer`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serializer {
    #[default]
    Json,

    #[serde(alias = "structured-text", alias = "yml")]
    Yaml,

    #[serde(alias = "rich-text", alias = "md")]
    Markdown,
}

impl Serializer {
    /// Name used in configuration files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
        }
    }
}

impl RecordSerializer for Serializer {
    fn extension(&self) -> &str {
        match self {
            Self::Json => JsonSerializer.extension(),
            Self::Yaml => YamlSerializer.extension(),
            Self::Markdown => MarkdownSerializer.extension(),
        }
    }

    fn serialize(&self, record: &PageRecord) -> SerializeResult<Vec<u8>> {
        match self {
            Self::Json => JsonSerializer.serialize(record),
            Self::Yaml => YamlSerializer.serialize(record),
            Self::Markdown => MarkdownSerializer.serialize(record),
        }
    }
}

impl fmt::Display for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Serializer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" | "structured-text" => Ok(Self::Yaml),
            "markdown" | "md" | "rich-text" => Ok(Self::Markdown),
            _ => Err(ConfigError::UnknownValue {
                field: "serializer",
                value: s.to_string(),
            }),
        }
    }
}
