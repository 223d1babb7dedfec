//! Post-processing of `snippet()` output: whitespace cleanup and splitting
//! on highlight markers for rendering.

use crate::extract::clean_text;
use crate::utils::app_data::SnippetStyle;

/// A run of snippet text, highlighted or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Collapse newlines and whitespace runs in a snippet
pub fn normalize_snippet(snippet: &str) -> String {
    clean_text(snippet)
}

/// Split a snippet into plain and highlighted runs.
///
/// A start marker with no matching end marker is kept as plain text.
pub fn split_highlights<'a>(snippet: &'a str, style: &SnippetStyle) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut rest = snippet;

    while let Some(start) = rest.find(&style.start) {
        let after_start = &rest[start + style.start.len()..];
        let Some(end) = after_start.find(&style.end) else {
            break;
        };

        if start > 0 {
            segments.push(Segment { text: &rest[..start], highlighted: false });
        }
        if end > 0 {
            segments.push(Segment { text: &after_start[..end], highlighted: true });
        }
        rest = &after_start[end + style.end.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment { text: rest, highlighted: false });
    }
    segments
}

/// Snippet text with every marker pair removed
pub fn strip_markers(snippet: &str, style: &SnippetStyle) -> String {
    split_highlights(snippet, style)
        .into_iter()
        .map(|segment| segment.text)
        .collect()
}
