//! Serializer trait and error types
//!
//! This module defines the two-member contract every output format
//! implements: a file extension and a record-to-bytes encoding.

use crate::record::PageRecord;
use thiserror::Error;

/// Errors that can occur while encoding a record
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Markdown rendering failed: {0}")]
    Markdown(String),
}

/// Result type for serialization
pub type SerializeResult<T> = Result<T, SerializeError>;

/// Trait for output formats
///
/// Implementations must be deterministic: the same record always yields the
/// same bytes. The record is borrowed, serializers never change it.
pub trait RecordSerializer: Send + Sync {
    /// File extension without the leading dot
    fn extension(&self) -> &str;

    /// Encodes a record into the bytes written to disk
    fn serialize(&self, record: &PageRecord) -> SerializeResult<Vec<u8>>;
}
