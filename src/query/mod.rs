//! Batch and interactive queries over the full-text index.

pub mod engine;
pub mod snippet;

pub use engine::QueryEngine;
pub use snippet::{Segment, normalize_snippet, split_highlights, strip_markers};
