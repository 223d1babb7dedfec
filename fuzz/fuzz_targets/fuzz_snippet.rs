#![no_main]

use libfuzzer_sys::fuzz_target;
use pdf_fts::query::snippet::{split_highlights, strip_markers};
use pdf_fts::utils::SnippetStyle;

fuzz_target!(|data: &str| {
    // Splitting must never panic on unbalanced or overlapping markers,
    // and the segments must only ever shrink the input
    for style in [SnippetStyle::batch(), SnippetStyle::live()] {
        let segments = split_highlights(data, &style);
        let total: usize = segments.iter().map(|s| s.text.len()).sum();
        assert!(total <= data.len());
        let _ = strip_markers(data, &style);
    }
});
