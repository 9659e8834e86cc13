//! Filesystem sink
//!
//! Writes records as plain files under the output root.

use async_trait::async_trait;
use std::path::Path;

use crate::storage::traits::{RecordSink, StorageError, StorageResult};

/// Sink that writes straight to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

#[async_trait]
impl RecordSink for FsSink {
    async fn ensure_dir(&self, dir: &Path) -> StorageResult<()> {
        // create_dir_all tolerates a concurrent creator of the same directory
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("article");

        FsSink.ensure_dir(&target).await.unwrap();
        FsSink
            .write(&target.join("1.json"), b"{\"aid\":1}")
            .await
            .unwrap();

        let written = std::fs::read(target.join("1.json")).unwrap();
        assert_eq!(written, b"{\"aid\":1}");
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent_under_concurrency() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("user").join("nested");

        let sink = FsSink;
        let results = futures::future::join_all((0..16).map(|_| sink.ensure_dir(&target))).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let result = FsSink
            .write(&dir.path().join("missing").join("1.json"), b"x")
            .await;

        assert!(matches!(result, Err(StorageError::Write { .. })));
    }
}
