//! Transform stage
//!
//! Transforms edit a record between extraction and serialization, e.g. to
//! redact or enrich it. They run in registration order, each receiving the
//! previous stage's output.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::PageRecord;

/// Error raised by a transform; drops the output of the pipeline it ran in
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A record edit applied to every record of a run
#[async_trait]
pub trait Transform: Send + Sync {
    async fn transform(&self, record: PageRecord) -> Result<PageRecord, TransformError>;
}

/// Adapts a plain closure into a [`Transform`]
///
/// # Example
///
/// ```
/// use bbs_archive::stages::FnTransform;
/// use bbs_archive::PageRecord;
///
/// let drop_avatars = FnTransform::new(|mut record: PageRecord| {
///     if let PageRecord::User(user) = &mut record {
///         user.avatar = "data:,".to_string();
///     }
///     Ok(record)
/// });
/// # let _ = drop_avatars;
/// ```
pub struct FnTransform<F> {
    f: F,
}

impl<F> FnTransform<F>
where
    F: Fn(PageRecord) -> Result<PageRecord, TransformError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Transform for FnTransform<F>
where
    F: Fn(PageRecord) -> Result<PageRecord, TransformError> + Send + Sync,
{
    async fn transform(&self, record: PageRecord) -> Result<PageRecord, TransformError> {
        (self.f)(record)
    }
}

/// Runs every transform in order, stopping at the first failure
pub async fn apply_transforms<T>(
    transforms: &[T],
    mut record: PageRecord,
) -> Result<PageRecord, TransformError>
where
    T: AsRef<dyn Transform>,
{
    for stage in transforms {
        record = stage.as_ref().transform(record).await?;
    }
    Ok(record)
}
