//! Text extraction boundary.
//!
//! The scan pipeline only depends on the [`Extractor`] trait; [`PdfExtractor`]
//! is the production implementation.

use crate::error::{Error, Result};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Produces one text string per page of a document.
///
/// Implementations substitute an empty string for a page that cannot be
/// read and only fail when the document as a whole is unusable.
pub trait Extractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Collapse whitespace runs to a single space and trim
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// PDF text extraction backed by `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        PdfExtractor
    }
}

impl Extractor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        debug!("Extracting text from {}", path.display());

        // The parser can panic on malformed input; keep that inside this document
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path)));

        let pages = match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(err)) => {
                return Err(Error::Extraction {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
            Err(_) => {
                return Err(Error::Extraction {
                    path: path.to_path_buf(),
                    message: "PDF parser panicked".to_string(),
                });
            }
        };

        let cleaned: Vec<String> = pages.iter().map(|page| clean_text(page)).collect();
        let empty = cleaned.iter().filter(|page| page.is_empty()).count();
        if empty > 0 {
            warn!(
                "{} of {} pages in {} produced no text",
                empty,
                cleaned.len(),
                path.display()
            );
        }
        Ok(cleaned)
    }
}
