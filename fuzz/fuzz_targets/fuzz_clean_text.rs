#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let cleaned = pdf_fts::extract::clean_text(data);
    assert!(!cleaned.starts_with(char::is_whitespace));
    assert!(!cleaned.contains("  "));
});
