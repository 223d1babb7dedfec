//! # pdf-fts - Incremental full-text search over PDF collections
//!
//! pdf-fts crawls folders for PDF documents, extracts their text page by
//! page, and keeps it in an embedded SQLite database with an FTS5 index.
//! Rescans only re-extract documents whose SHA-1 fingerprint changed.
//!
//! ## Architecture
//!
//! - [`index`] - Crawling, change detection, the page store and its index
//! - [`query`] - Batch and interactive full-text queries
//! - [`extract`] - PDF text extraction behind the [`extract::Extractor`] trait
//! - [`context`] - Configuration plus the open store, passed explicitly
//! - [`tui`] - Interactive live search (feature `tui`)
//! - [`output`] - Search result formatting
//! - [`utils`] - Configuration, database discovery, progress bars
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_fts::context::{AppContext, StoreMode};
//! use pdf_fts::extract::PdfExtractor;
//! use pdf_fts::index::ScanPipeline;
//! use pdf_fts::query::QueryEngine;
//! use pdf_fts::utils::AppConfig;
//! use std::path::{Path, PathBuf};
//!
//! let mut ctx = AppContext::open(AppConfig::default(), Path::new("."), StoreMode::OpenOrCreate)?;
//! ScanPipeline::new(&mut ctx, &PdfExtractor).run(&[PathBuf::from(".")], false);
//!
//! let config = &ctx.config;
//! let engine = QueryEngine::new(&ctx.store, &config.search_snippet, &config.live_snippet);
//! for hit in engine.search("\"incremental index\"", 5)? {
//!     println!("{} p.{}: {}", hit.path, hit.page_num, hit.snippet);
//! }
//! ```

pub mod context;
pub mod error;
pub mod extract;
pub mod index;
pub mod output;
pub mod query;
#[cfg(feature = "tui")]
pub mod tui;
pub mod utils;

pub use error::{Error, Result};
