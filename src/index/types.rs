use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based page number within a document
pub type PageNum = u32;

/// Hex-encoded SHA-1 of a document's raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_digest(digest: &[u8]) -> Self {
        Fingerprint(hex::encode(digest))
    }

    /// Wrap an already-encoded value (as read back from the store)
    pub fn from_hex(value: impl Into<String>) -> Self {
        Fingerprint(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored page of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub page_num: PageNum,
    pub fingerprint: Fingerprint,
    pub content: String,
    pub last_scanned: NaiveDateTime,
}

/// A row of the derived full-text index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    pub page_num: PageNum,
    pub content: String,
}

/// A stored document and how many pages it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub path: String,
    pub page_count: usize,
}

/// Outcome of comparing a document against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// No pages stored for this path yet
    New,
    /// Stored fingerprint matches and no re-scan was forced
    Unchanged,
    /// Stored fingerprint differs, or a re-scan was forced
    Stale,
}

impl ChangeStatus {
    pub fn decide(stored: Option<&Fingerprint>, current: &Fingerprint, forced: bool) -> Self {
        match stored {
            None => ChangeStatus::New,
            Some(stored) if !forced && stored == current => ChangeStatus::Unchanged,
            Some(_) => ChangeStatus::Stale,
        }
    }

    pub fn needs_processing(self) -> bool {
        !matches!(self, ChangeStatus::Unchanged)
    }
}

/// A document queued for extraction in phase 3
#[derive(Debug, Clone)]
pub struct PendingDocument {
    pub path: String,
    pub fingerprint: Fingerprint,
    pub status: ChangeStatus,
}

/// Counters reported at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Candidate documents found by the crawler
    pub discovered: usize,
    /// Documents whose fingerprint matched the store
    pub unchanged: usize,
    /// Documents queued for extraction
    pub to_process: usize,
    /// Queued documents with no stored pages
    pub new_documents: usize,
    /// Queued documents whose stored pages are out of date (or forced)
    pub changed_documents: usize,
    /// Documents whose pages were replaced successfully
    pub updated: usize,
    /// Documents skipped because of a per-document error
    pub failed: usize,
}

/// Batch search result (ordered by path, then page)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub page_num: PageNum,
    pub snippet: String,
    pub last_scanned: NaiveDateTime,
}

/// Interactive search result (ordered by relevance)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveHit {
    pub path: String,
    pub page_num: PageNum,
    pub snippet: String,
}

/// Result of auditing the index against the page table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pages: usize,
    pub entries: usize,
    /// Index entries without a page
    pub orphan_entries: usize,
    /// Pages without an index entry
    pub missing_entries: usize,
    /// Pairs whose content differs
    pub mismatched: usize,
    /// Propagation triggers absent from the schema
    pub missing_triggers: usize,
}

impl SyncReport {
    pub fn is_consistent(&self) -> bool {
        self.orphan_entries == 0
            && self.missing_entries == 0
            && self.mismatched == 0
            && self.missing_triggers == 0
    }
}
