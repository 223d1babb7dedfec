//! Full-text index maintenance: rebuild and consistency audit.
//!
//! Incremental propagation happens in the triggers; this module only covers
//! the operator-invoked paths.

use crate::error::Result;
use crate::index::schema;
use crate::index::store::ContentStore;
use crate::index::types::{PageNum, SyncReport};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

pub struct IndexSynchronizer<'a> {
    store: &'a mut ContentStore,
}

impl<'a> IndexSynchronizer<'a> {
    pub fn new(store: &'a mut ContentStore) -> Self {
        Self { store }
    }

    /// Drop the index and its triggers, recreate them, and repopulate the
    /// index from the page table. Runs as one transaction; returns the number
    /// of entries written.
    pub fn rebuild(&mut self) -> Result<usize> {
        info!("Rebuilding full-text index");
        let tx = self.store.connection_mut().transaction()?;

        schema::drop_index(&tx)?;
        schema::create_fts_table(&tx)?;
        schema::create_triggers(&tx)?;

        debug!("Repopulating pdfs_fts from pdfs");
        let repopulated = tx.execute(
            "INSERT INTO pdfs_fts (path, page_num, content_idx)
             SELECT path, page_num, content FROM pdfs",
            [],
        )?;

        tx.commit()?;
        info!(entries = repopulated, "Full-text index rebuilt");
        Ok(repopulated)
    }

    /// Compare every page with its index entry. Read-only.
    pub fn check(&self) -> Result<SyncReport> {
        let conn = self.store.connection();
        let mut report = SyncReport::default();

        // key -> (entry count, content hash of the first entry)
        let mut entries: HashMap<(String, PageNum), (usize, u64)> = HashMap::new();
        {
            let mut stmt =
                conn.prepare("SELECT path, CAST(page_num AS INTEGER), content_idx FROM pdfs_fts")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let path: String = row.get(0)?;
                let page_num = row.get::<_, i64>(1)? as PageNum;
                let content: Option<String> = row.get(2)?;
                report.entries += 1;
                entries
                    .entry((path, page_num))
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert((1, content_hash(content.as_deref())));
            }
        }

        {
            let mut stmt = conn.prepare("SELECT path, page_num, content FROM pdfs")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let path: String = row.get(0)?;
                let page_num = row.get::<_, i64>(1)? as PageNum;
                let content: Option<String> = row.get(2)?;
                report.pages += 1;

                match entries.remove(&(path, page_num)) {
                    None => report.missing_entries += 1,
                    Some((count, hash)) => {
                        // Duplicates beyond the first are orphans
                        report.orphan_entries += count - 1;
                        if hash != content_hash(content.as_deref()) {
                            report.mismatched += 1;
                        }
                    }
                }
            }
        }

        report.orphan_entries += entries.values().map(|(count, _)| count).sum::<usize>();

        let missing = schema::missing_triggers(conn)?;
        if !missing.is_empty() {
            debug!(?missing, "Propagation triggers not installed");
        }
        report.missing_triggers = missing.len();
        Ok(report)
    }
}

fn content_hash(content: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.unwrap_or_default().hash(&mut hasher);
    hasher.finish()
}
