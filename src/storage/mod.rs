//! Storage module for persisting archived records
//!
//! Every successfully processed ID ends up as one file at
//! `<output root>/<kind>/<file name>`. The sink behind that layout is a trait
//! so runs can be pointed at something other than the local disk.

mod fs;
mod traits;

pub use fs::FsSink;
pub use traits::{RecordSink, StorageError, StorageResult};

use crate::record::RecordKind;
use std::path::{Path, PathBuf};

/// Returns the directory records of a kind are written to
pub fn kind_dir(output_root: &Path, kind: RecordKind) -> PathBuf {
    output_root.join(kind.dir_name())
}

/// Returns the full path of a record file
pub fn record_path(output_root: &Path, kind: RecordKind, file_name: &Path) -> PathBuf {
    kind_dir(output_root, kind).join(file_name)
}
