//! Pipeline extension points
//!
//! Callers plug cross-cutting record edits and custom file layouts into a run
//! through these two contracts without touching the coordinator:
//!
//! - `Transform`: ordered record edits between extraction and serialization
//! - `Namer`: file name policy, defaulting to `<id>.<extension>`

mod naming;
mod transform;

pub use naming::{checked_relative_path, DefaultNamer, FnNamer, Namer, NamingError};
pub use transform::{apply_transforms, FnTransform, Transform, TransformError};
