use crate::context::AppContext;
use crate::error::Error;
use crate::extract::Extractor;
use crate::index::crawl::Crawler;
use crate::index::detect::{ChangeDetector, fingerprint_file};
use crate::index::stats::{format_size, store_size};
use crate::index::types::{ChangeStatus, PendingDocument, ScanReport};
use crate::utils::progress::PhaseProgress;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Three-phase scan: discover, detect changes, extract and store.
///
/// Each phase completes before the next begins. Any error tied to a single
/// document is logged, counted in [`ScanReport::failed`] and skipped.
pub struct ScanPipeline<'a> {
    ctx: &'a mut AppContext,
    extractor: &'a dyn Extractor,
    quiet: bool,
}

impl<'a> ScanPipeline<'a> {
    pub fn new(ctx: &'a mut AppContext, extractor: &'a dyn Extractor) -> Self {
        Self {
            ctx,
            extractor,
            quiet: false,
        }
    }

    /// Suppress phase headers and progress bars
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn run(&mut self, roots: &[PathBuf], force: bool) -> ScanReport {
        let label = self.ctx.config.extension.to_uppercase();
        let mut report = ScanReport::default();
        debug!(?roots, force, "Starting scan");

        // Phase 1: discovery
        self.announce(&format!("Phase 1: Discovering {} files...", label));
        let candidates = self.discover(roots);
        report.discovered = candidates.len();

        if candidates.is_empty() {
            self.announce(&format!("No {} files found.", label));
            self.announce_size();
            return report;
        }
        self.announce(&format!("Found {} {} files.\n", candidates.len(), label));

        // Phase 2: change detection
        self.announce("Phase 2: Checking file hashes...");
        let pending = self.detect_changes(&candidates, force, &mut report);
        report.to_process = pending.len();

        if pending.is_empty() {
            self.announce("All files are up to date. No processing needed.");
            self.announce_size();
            return report;
        }
        debug!(
            new = report.new_documents,
            changed = report.changed_documents,
            "Documents queued"
        );
        self.announce(&format!("{} files need processing.\n", pending.len()));

        // Phase 3: extraction and storage
        self.announce(&format!("Phase 3: Processing {} content...", label));
        self.process(&pending, &mut report);

        self.announce(&format!(
            "\nScan completed. Processed {} {}s, updated {} entries.",
            report.discovered, label, report.updated
        ));
        if report.failed > 0 {
            self.announce(&format!("{} files could not be processed (see warnings).", report.failed));
        }
        self.announce_size();
        report
    }

    fn discover(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let spinner = PhaseProgress::spinner("Discovering files...", !self.quiet);
        let crawler = Crawler::new(
            &self.ctx.config.extension,
            self.ctx.config.respect_ignore_files,
        );
        let found = crawler.discover(roots);
        spinner.finish(format!("Found {} files", found.len()));
        found
    }

    /// Hashing runs in parallel; store lookups stay on this thread
    fn detect_changes(
        &self,
        candidates: &[PathBuf],
        force: bool,
        report: &mut ScanReport,
    ) -> Vec<PendingDocument> {
        let progress = PhaseProgress::bar(candidates.len(), "Checking hashes", !self.quiet);

        let hashed: Vec<_> = candidates
            .par_iter()
            .map(|path| {
                let result = fingerprint_file(path);
                progress.inc();
                (path, result)
            })
            .collect();
        progress.finish("Hashes checked");

        let detector = ChangeDetector::new(&self.ctx.store);
        let mut pending = Vec::new();

        for (path, result) in hashed {
            let fingerprint = match result {
                Ok(fp) => fp,
                Err(err) => {
                    record_failure(report, "Skipping", &path.to_string_lossy(), &err);
                    continue;
                }
            };

            let key = document_key(path);
            match detector.compare(&key, &fingerprint, force) {
                Ok(status) if !status.needs_processing() => {
                    debug!("File up to date: {}", key);
                    report.unchanged += 1;
                }
                Ok(status) => {
                    debug!(?status, "File needs processing: {}", key);
                    match status {
                        ChangeStatus::New => report.new_documents += 1,
                        _ => report.changed_documents += 1,
                    }
                    pending.push(PendingDocument {
                        path: key,
                        fingerprint,
                        status,
                    });
                }
                Err(err) => {
                    record_failure(report, "Failed to get stored hash for", &key, &err);
                }
            }
        }

        pending
    }

    fn process(&mut self, pending: &[PendingDocument], report: &mut ScanReport) {
        let progress = PhaseProgress::bar(pending.len(), "Processing documents", !self.quiet);

        for doc in pending {
            match doc.status {
                ChangeStatus::New => debug!("Processing new document: {}", doc.path),
                _ => debug!("Reprocessing document: {}", doc.path),
            }

            let pages = match self.extractor.extract_pages(Path::new(&doc.path)) {
                Ok(pages) => pages,
                Err(err) => {
                    record_failure(report, "Failed to process", &doc.path, &err);
                    progress.inc();
                    continue;
                }
            };

            match self
                .ctx
                .store
                .upsert_document(&doc.path, &doc.fingerprint, &pages)
            {
                Ok(count) => {
                    debug!("Stored {} pages for {}", count, doc.path);
                    report.updated += 1;
                }
                Err(err) => {
                    record_failure(report, "Failed to store data for", &doc.path, &err);
                }
            }
            progress.inc();
        }

        progress.finish(format!("Updated {} documents", report.updated));
    }

    fn announce(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    fn announce_size(&self) {
        if let Some(line) = self.size_line() {
            self.announce(&line);
        }
    }

    fn size_line(&self) -> Option<String> {
        store_size(self.ctx.db_path()).map(|size| format!("Database size: {}", format_size(size)))
    }
}

/// Count a skipped document. Errors that are not tied to the document
/// itself (store or I/O failures) are logged at error level.
fn record_failure(report: &mut ScanReport, action: &str, path: &str, err: &Error) {
    if err.is_per_document() {
        warn!("{} {}: {}", action, path, err);
    } else {
        error!("{} {}: {}", action, path, err);
    }
    report.failed += 1;
}

/// Stored path string for a discovered file
pub fn document_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
