//! Crawler module for walking forum ID spaces
//!
//! This module contains the core archiving logic, including:
//! - HTTP fetching with the "never allocated" page detection
//! - Splitting ID ranges into bounded batches
//! - The per-ID fetch/extract/transform/name/serialize/persist pipeline
//! - Overall run coordination and termination

mod coordinator;
mod fetcher;
mod pipeline;
mod scheduler;

pub use coordinator::{run_archive, Coordinator};
pub use fetcher::{
    build_http_client, Asset, FetchError, HttpFetcher, PageFetcher, NOT_FOUND_MARKER,
};
pub use pipeline::{page_url, run_one, PipelineContext, PipelineError, PipelineOutcome};
pub use scheduler::IdBatches;
