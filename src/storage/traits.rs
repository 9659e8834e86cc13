//! Storage traits and error types
//!
//! This module defines the trait interface for persistence sinks and the
//! errors they report.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting a record
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence sinks
///
/// Pipelines of the same batch call into one sink concurrently. Writes never
/// collide on a path, but several pipelines may ensure the same directory at
/// once, so `ensure_dir` must be idempotent.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Ensures a directory and all its parents exist
    async fn ensure_dir(&self, dir: &Path) -> StorageResult<()>;

    /// Writes bytes to a path, replacing any previous content
    async fn write(&self, path: &Path, bytes: &[u8]) -> StorageResult<()>;
}
