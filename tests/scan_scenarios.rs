//! End-to-end scan scenarios driven through the library.
//!
//! Documents are plain text files with a `.pdf` extension; the fake extractor
//! splits them into pages on form feeds so page content is fully controlled.

use pdf_fts::context::AppContext;
use pdf_fts::extract::Extractor;
use pdf_fts::index::build::document_key;
use pdf_fts::index::detect::fingerprint_file;
use pdf_fts::index::{IndexSynchronizer, ScanPipeline, ScanReport};
use pdf_fts::query::QueryEngine;
use pdf_fts::utils::AppConfig;
use pdf_fts::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TextPages;

impl Extractor for TextPages {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        if text.starts_with("%BROKEN") {
            return Err(Error::Extraction {
                path: path.to_path_buf(),
                message: "not a valid document".to_string(),
            });
        }
        Ok(text.split('\x0c').map(str::to_string).collect())
    }
}

struct Fixture {
    _dir: TempDir,
    docs: PathBuf,
    ctx: AppContext,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("library");
        fs::create_dir_all(&docs).unwrap();
        let ctx = AppContext::with_store_at(AppConfig::default(), &dir.path().join("fts.db")).unwrap();
        Self { _dir: dir, docs, ctx }
    }

    fn write(&self, name: &str, pages: &[&str]) -> PathBuf {
        let path = self.docs.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, pages.join("\x0c")).unwrap();
        path
    }

    fn scan(&mut self, force: bool) -> ScanReport {
        let roots = [self.docs.clone()];
        ScanPipeline::new(&mut self.ctx, &TextPages)
            .quiet(true)
            .run(&roots, force)
    }

    fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(
            &self.ctx.store,
            &self.ctx.config.search_snippet,
            &self.ctx.config.live_snippet,
        )
    }
}

#[test]
fn scenario_a_empty_directory() {
    let mut fx = Fixture::new();
    let report = fx.scan(false);

    assert_eq!(report.discovered, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(fx.ctx.store.page_count().unwrap(), 0);
    assert_eq!(fx.ctx.store.index_entry_count().unwrap(), 0);
}

#[test]
fn scenario_b_two_page_document_then_rescan() {
    let mut fx = Fixture::new();
    let file = fx.write("doc.pdf", &["foo bar", "baz qux"]);

    let first = fx.scan(false);
    assert_eq!(first.discovered, 1);
    assert_eq!(first.updated, 1);
    assert_eq!(fx.ctx.store.page_count().unwrap(), 2);
    assert_eq!(fx.ctx.store.index_entry_count().unwrap(), 2);

    let key = document_key(&file);
    let pages = fx.ctx.store.pages(&key).unwrap();
    let fingerprint = fingerprint_file(&file).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.fingerprint == fingerprint));
    assert_eq!(pages[0].page_num, 1);
    assert_eq!(pages[1].content, "baz qux");

    let second = fx.scan(false);
    assert_eq!(second.unchanged, 1);
    assert_eq!(second.to_process, 0);
    assert_eq!(second.updated, 0);
}

#[test]
fn scenario_c_changed_document_replaced_atomically() {
    let mut fx = Fixture::new();
    let file = fx.write("doc.pdf", &["foo bar", "baz qux"]);
    fx.scan(false);
    let old = fingerprint_file(&file).unwrap();

    fx.write("doc.pdf", &["foo bar baz", "qux"]);
    let new = fingerprint_file(&file).unwrap();
    assert_ne!(old, new);

    let report = fx.scan(false);
    assert_eq!(report.to_process, 1);
    assert_eq!(report.updated, 1);

    let key = document_key(&file);
    let pages = fx.ctx.store.pages(&key).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.fingerprint == new));

    let entries = fx.ctx.store.index_entries(&key).unwrap();
    let contents: Vec<&str> = entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, vec!["foo bar baz", "qux"]);
}

#[test]
fn shrinking_document_leaves_no_stale_entries() {
    let mut fx = Fixture::new();
    let file = fx.write("doc.pdf", &["one", "two", "three", "four"]);
    fx.scan(false);

    fx.write("doc.pdf", &["only"]);
    fx.scan(false);

    let key = document_key(&file);
    assert_eq!(fx.ctx.store.index_entries(&key).unwrap().len(), 1);
    assert!(fx.engine().search("three", 5).unwrap().is_empty());
}

#[test]
fn scenario_d_search_highlights_match() {
    let mut fx = Fixture::new();
    let file = fx.write("doc.pdf", &["foo bar", "baz qux"]);
    fx.scan(false);

    let hits = fx.engine().search("bar", 5).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, document_key(&file));
    assert_eq!(hits[0].page_num, 1);
    assert!(hits[0].snippet.contains("[HL]bar[/HL]"));
}

#[test]
fn scenario_e_rebuild_matches_pages() {
    let mut fx = Fixture::new();
    fx.write("a.pdf", &["alpha", "beta", "gamma"]);
    fx.write("nested/b.pdf", &["delta epsilon"]);
    fx.scan(false);
    let pages = fx.ctx.store.page_count().unwrap();
    assert_eq!(pages, 4);

    let before = fx.engine().search("alpha OR delta", 10).unwrap();
    let rebuilt = IndexSynchronizer::new(&mut fx.ctx.store).rebuild().unwrap();
    assert_eq!(rebuilt, pages);
    assert_eq!(fx.ctx.store.index_entry_count().unwrap(), pages);

    let audit = IndexSynchronizer::new(&mut fx.ctx.store).check().unwrap();
    assert!(audit.is_consistent(), "{:?}", audit);

    let after = fx.engine().search("alpha OR delta", 10).unwrap();
    assert_eq!(before, after);
}

#[test]
fn force_reprocesses_unchanged_documents() {
    let mut fx = Fixture::new();
    fx.write("a.pdf", &["alpha"]);
    fx.write("b.pdf", &["beta"]);
    fx.scan(false);

    let report = fx.scan(true);
    assert_eq!(report.unchanged, 0);
    assert_eq!(report.to_process, 2);
    assert_eq!(report.updated, 2);
    assert_eq!(fx.ctx.store.page_count().unwrap(), 2);
}

#[test]
fn broken_document_is_isolated_and_retried() {
    let mut fx = Fixture::new();
    fx.write("good.pdf", &["readable text"]);
    let bad = fx.write("bad.pdf", &["%BROKEN"]);

    let report = fx.scan(false);
    assert_eq!(report.discovered, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 1);
    assert!(fx.ctx.store.pages(&document_key(&bad)).unwrap().is_empty());

    fx.write("bad.pdf", &["repaired"]);
    let report = fx.scan(false);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn other_extensions_are_ignored() {
    let mut fx = Fixture::new();
    fx.write("notes.txt", &["alpha"]);
    fx.write("UPPER.PDF", &["alpha"]);

    let report = fx.scan(false);
    assert_eq!(report.discovered, 1);
    assert_eq!(fx.ctx.store.document_count().unwrap(), 1);
}

#[test]
fn live_search_properties() {
    let mut fx = Fixture::new();
    fx.write("a.pdf", &["searchable words", "more searchable words"]);
    fx.scan(false);

    let engine = fx.engine();
    assert!(engine.live_search("", 5).unwrap().is_empty());
    for limit in [0, 1, 2, 10] {
        assert!(engine.live_search("searchable", limit).unwrap().len() <= limit);
        assert!(engine.search("searchable", limit).unwrap().len() <= limit);
    }
}
