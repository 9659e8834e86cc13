//! Crawl coordinator - main archive orchestration logic
//!
//! This module contains the scan loop that walks each record kind's ID space:
//! - Splitting the ID range into bounded batches
//! - Running one pipeline per ID concurrently within a batch
//! - Waiting for the whole batch before deciding whether to continue
//! - Stopping a kind's scan once any pipeline reports the end of its ID space
//!
//! Kinds are processed one after another and share no termination state.
//! Because batch N+1 never starts before batch N has resolved, an exhaustion
//! signal from an ID cannot be overtaken by output from a later batch. IDs in
//! the same batch as the signalling one still finish and keep their output.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::pipeline::{run_one, PipelineContext, PipelineOutcome};
use crate::crawler::scheduler::IdBatches;
use crate::output::{KindSummary, RecordSerializer, RunSummary};
use crate::record::RecordKind;
use crate::stages::{Namer, Transform};
use crate::storage::{FsSink, RecordSink};
use crate::{ArchiveError, ConfigError};
use futures::future::join_all;
use std::sync::Arc;
use url::Url;

/// Main archive coordinator
///
/// Holds the validated configuration and the pluggable stages. Extension
/// points are set with the builder-style methods before calling [`run`].
///
/// [`run`]: Coordinator::run
pub struct Coordinator {
    config: Arc<Config>,
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn RecordSink>,
    serializer: Arc<dyn RecordSerializer>,
    transforms: Vec<Arc<dyn Transform>>,
    namer: Option<Arc<dyn Namer>>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, makes sure the output root can be created
    /// and builds the HTTP client.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ArchiveError)` - Invalid configuration or unusable output root
    pub fn new(config: Config) -> Result<Self, ArchiveError> {
        validate(&config)?;

        let base_url = Url::parse(&config.base_url)?;

        std::fs::create_dir_all(&config.output_dir).map_err(|source| ArchiveError::OutputDir {
            path: config.output_dir.display().to_string(),
            source,
        })?;

        let fetcher = HttpFetcher::from_config(&config.http)?;
        let serializer = config.serializer;

        Ok(Self {
            config: Arc::new(config),
            base_url,
            fetcher: Arc::new(fetcher),
            sink: Arc::new(FsSink),
            serializer: Arc::new(serializer),
            transforms: Vec::new(),
            namer: None,
        })
    }

    /// Replaces the page fetcher
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replaces the persistence sink
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the configured output format
    pub fn with_serializer(mut self, serializer: Arc<dyn RecordSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Appends a transform; transforms run in the order they were added
    pub fn pipe<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    /// Sets the file naming policy, replacing `<id>.<extension>`
    pub fn set_namer<N: Namer + 'static>(mut self, namer: N) -> Self {
        self.namer = Some(Arc::new(namer));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the scan for every configured kind, in order
    ///
    /// Individual page failures never fail the run; they show up in the
    /// returned summary.
    pub async fn run(&self) -> Result<RunSummary, ArchiveError> {
        let ctx = Arc::new(self.pipeline_context()?);
        let mut summary = RunSummary::default();

        for &kind in &self.config.kinds {
            summary.kinds.push(self.run_kind(kind, &ctx).await);
        }

        Ok(summary)
    }

    /// Scans one kind's ID space batch by batch
    async fn run_kind(&self, kind: RecordKind, ctx: &Arc<PipelineContext>) -> KindSummary {
        let mut summary = KindSummary::new(kind);
        let batches = IdBatches::new(
            self.config.start_id,
            self.config.max_id,
            self.config.max_concurrent,
        );

        tracing::info!(
            "Archiving {} from ID {} to {}",
            kind,
            self.config.start_id,
            self.config
                .max_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "the end".to_string())
        );

        for batch in batches {
            summary.batches += 1;
            summary.started += batch.len() as u64;
            summary.last_id = batch.last().copied();

            tracing::debug!(
                "{} batch {}: IDs {}..={}",
                kind,
                summary.batches,
                batch.first().copied().unwrap_or_default(),
                batch.last().copied().unwrap_or_default()
            );

            let outcomes = run_batch(kind, &batch, ctx).await;

            for (id, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    PipelineOutcome::Completed { .. } => summary.written += 1,
                    PipelineOutcome::Skipped { .. } => summary.skipped += 1,
                    PipelineOutcome::Exhausted => {
                        summary.skipped += 1;
                        summary.exhausted_at = Some(summary.exhausted_at.map_or(*id, |at| at.min(*id)));
                    }
                }
            }

            if let Some(end) = summary.exhausted_at {
                tracing::info!("{} ID space ends at {}, stopping", kind, end);
                break;
            }
        }

        tracing::info!(
            "Finished {}: {} written, {} skipped in {} batches",
            kind,
            summary.written,
            summary.skipped,
            summary.batches
        );

        summary
    }

    fn pipeline_context(&self) -> Result<PipelineContext, ArchiveError> {
        let offset = self.config.extract.offset().ok_or_else(|| {
            ConfigError::Validation(format!(
                "utc_offset must look like '+08:00', got '{}'",
                self.config.extract.utc_offset
            ))
        })?;

        Ok(PipelineContext {
            base_url: self.base_url.clone(),
            output_root: self.config.output_dir.clone(),
            offset,
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            serializer: Arc::clone(&self.serializer),
            transforms: self.transforms.clone(),
            namer: self.namer.clone(),
        })
    }
}

/// Runs one pipeline per ID concurrently and waits for all of them
///
/// Outcomes are returned in the order of `ids`. A pipeline task that panics
/// counts as skipped and does not disturb its siblings.
async fn run_batch(
    kind: RecordKind,
    ids: &[u64],
    ctx: &Arc<PipelineContext>,
) -> Vec<PipelineOutcome> {
    let handles = ids.iter().map(|&id| {
        let ctx = Arc::clone(ctx);
        tokio::spawn(async move { run_one(kind, id, &ctx).await })
    });

    join_all(handles)
        .await
        .into_iter()
        .zip(ids)
        .map(|(joined, id)| {
            joined.unwrap_or_else(|e| {
                tracing::error!("{} {} pipeline task failed: {}", kind, id, e);
                PipelineOutcome::Skipped {
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Runs a complete archive with the default stages
pub async fn run_archive(config: Config) -> Result<RunSummary, ArchiveError> {
    Coordinator::new(config)?.run().await
}
