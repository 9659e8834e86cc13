//! Per-ID pipeline
//!
//! One pipeline archives one (kind, id) pair:
//! fetch → extract → transform → name → serialize → persist.
//!
//! Failures never escape a pipeline. They are logged and folded into a
//! [`PipelineOutcome`]; only a "never allocated" answer from the source is
//! reported as [`PipelineOutcome::Exhausted`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::FixedOffset;
use thiserror::Error;
use url::Url;

use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::extract::{ExtractContext, ExtractError, Extractor};
use crate::output::{RecordSerializer, SerializeError};
use crate::record::RecordKind;
use crate::stages::{
    apply_transforms, checked_relative_path, DefaultNamer, Namer, NamingError, Transform,
    TransformError,
};
use crate::storage::{record_path, RecordSink, StorageError};

/// Why a pipeline produced no output
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ID was never allocated; the ID space ends here
    #[error("not found, no more pages")]
    RangeExhausted,

    /// The ID exists but the page is removed or restricted
    #[error("page unavailable (HTTP {status})")]
    PageUnavailable { status: u16 },

    #[error("fetch failed: {0}")]
    Fetch(FetchError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("naming failed: {0}")]
    Naming(#[from] NamingError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializeError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("invalid page address: {0}")]
    Address(#[from] url::ParseError),
}

impl From<FetchError> for PipelineError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::NotFound => PipelineError::RangeExhausted,
            FetchError::Unavailable { status } => PipelineError::PageUnavailable { status },
            other => PipelineError::Fetch(other),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A file was written
    Completed { path: PathBuf },

    /// No output for this ID; the scan goes on
    Skipped { reason: String },

    /// The source reported that the ID space ends at this ID
    Exhausted,
}

impl PipelineOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Read-only state shared by every pipeline of a run
pub struct PipelineContext {
    pub base_url: Url,
    pub output_root: PathBuf,
    pub offset: FixedOffset,
    pub fetcher: Arc<dyn PageFetcher>,
    pub sink: Arc<dyn RecordSink>,
    pub serializer: Arc<dyn RecordSerializer>,
    pub transforms: Vec<Arc<dyn Transform>>,
    pub namer: Option<Arc<dyn Namer>>,
}

/// Builds the page address `<base>/<segment>/<id>`
pub fn page_url(base_url: &Url, kind: RecordKind, id: u64) -> Result<Url, url::ParseError> {
    let base = base_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/{}/{}", base, kind.path_segment(), id))
}

/// Runs the pipeline for one ID and reports its outcome
pub async fn run_one(kind: RecordKind, id: u64, ctx: &PipelineContext) -> PipelineOutcome {
    let url = match page_url(&ctx.base_url, kind, id) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("{} {}: invalid page address: {}", kind, id, e);
            return PipelineOutcome::Skipped {
                reason: PipelineError::from(e).to_string(),
            };
        }
    };

    tracing::info!("{} processing", url);

    match process(kind, id, &url, ctx).await {
        Ok(path) => {
            tracing::info!("{} finished", url);
            PipelineOutcome::Completed { path }
        }
        Err(PipelineError::RangeExhausted) => {
            tracing::info!("{} not found", url);
            PipelineOutcome::Exhausted
        }
        Err(e) => {
            tracing::warn!("{} {}", url, e);
            PipelineOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    }
}

async fn process(
    kind: RecordKind,
    id: u64,
    url: &Url,
    ctx: &PipelineContext,
) -> Result<PathBuf, PipelineError> {
    let html = ctx.fetcher.fetch_page(url).await?;

    let extract_ctx = ExtractContext {
        id,
        page_url: url,
        offset: ctx.offset,
        fetcher: ctx.fetcher.as_ref(),
    };
    let record = Extractor::for_kind(kind)
        .extract(&html, &extract_ctx)
        .await?;

    let record = apply_transforms(&ctx.transforms, record).await?;

    let extension = ctx.serializer.extension();
    let file_name = match &ctx.namer {
        Some(namer) => namer.name(&record, id, extension).await?,
        None => DefaultNamer::file_name(id, extension),
    };
    let relative = checked_relative_path(&file_name)?;

    let bytes = ctx.serializer.serialize(&record)?;

    let path = record_path(&ctx.output_root, kind, &relative);
    if let Some(parent) = path.parent() {
        ctx.sink.ensure_dir(parent).await?;
    }
    ctx.sink.write(&path, &bytes).await?;

    Ok(path)
}
