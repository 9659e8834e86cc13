//! Record model
//!
//! The typed records the archiver produces, one variant per record kind, plus
//! the helpers that keep them self-contained.
//!
//! # Components
//!
//! - `RecordKind`: the three ID spaces (article, user, category)
//! - `PageRecord`: tagged union of everything that flows through a pipeline
//! - `encode_data_url`: embeds binary assets (avatars) directly in a record

mod kind;
mod types;

pub use kind::RecordKind;
pub use types::{Article, Category, Comment, PageRecord, User};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encodes raw bytes as a `data:` URL
///
/// An empty MIME type falls back to `application/octet-stream`.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    let mime = mime.trim();
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
