//! Naming stage
//!
//! A namer decides the file name a record is stored under, relative to
//! `<output>/<kind>/`. Without a custom namer files are called `<id>.<ext>`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::record::PageRecord;

/// Errors raised while naming a record's output file
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Namer failed: {0}")]
    Failed(String),

    #[error("Invalid file name '{0}': must be a non-empty relative path without '..'")]
    InvalidName(String),
}

/// File layout policy for archived records
#[async_trait]
pub trait Namer: Send + Sync {
    async fn name(
        &self,
        record: &PageRecord,
        id: u64,
        extension: &str,
    ) -> Result<String, NamingError>;
}

/// The `<id>.<extension>` layout
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl DefaultNamer {
    pub fn file_name(id: u64, extension: &str) -> String {
        format!("{}.{}", id, extension)
    }
}

#[async_trait]
impl Namer for DefaultNamer {
    async fn name(
        &self,
        _record: &PageRecord,
        id: u64,
        extension: &str,
    ) -> Result<String, NamingError> {
        Ok(Self::file_name(id, extension))
    }
}

/// Adapts a plain closure into a [`Namer`]
pub struct FnNamer<F> {
    f: F,
}

impl<F> FnNamer<F>
where
    F: Fn(&PageRecord, u64, &str) -> String + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Namer for FnNamer<F>
where
    F: Fn(&PageRecord, u64, &str) -> String + Send + Sync,
{
    async fn name(
        &self,
        record: &PageRecord,
        id: u64,
        extension: &str,
    ) -> Result<String, NamingError> {
        Ok((self.f)(record, id, extension))
    }
}

/// Checks that a produced name stays inside the kind directory
///
/// Subdirectories are allowed (`2019/42.json`); absolute paths and `..`
/// components are not.
pub fn checked_relative_path(name: &str) -> Result<PathBuf, NamingError> {
    let path = Path::new(name);
    if name.trim().is_empty() || path.is_absolute() {
        return Err(NamingError::InvalidName(name.to_string()));
    }

    let mut has_file = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_file = true,
            Component::CurDir => {}
            _ => return Err(NamingError::InvalidName(name.to_string())),
        }
    }

    if !has_file {
        return Err(NamingError::InvalidName(name.to_string()));
    }

    Ok(path.to_path_buf())
}
