//! Durable per-page content store.
//!
//! Every mutation of the `pdfs` table fires one of the triggers installed by
//! [`schema`](crate::index::schema), so the full-text index is written in the
//! same transaction as the page it mirrors.

use crate::error::{Error, Result};
use crate::index::schema;
use crate::index::types::{DocumentSummary, Fingerprint, IndexEntry, Page, PageNum};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to the page table and its synchronized index
pub struct ContentStore {
    conn: Connection,
    location: Option<PathBuf>,
}

impl ContentStore {
    /// Open (or create) the store file and make sure the schema exists
    pub fn open(db_path: &Path) -> Result<Self> {
        debug!("Opening database at {}", db_path.display());
        let conn = Connection::open(db_path)?;
        schema::configure(&conn)?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            location: Some(db_path.to_path_buf()),
        })
    }

    /// Private in-memory store, used by tests and benchmarks
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            location: None,
        })
    }

    /// Path of the backing file (`None` for in-memory stores)
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Fingerprint carried by the document's pages, if any are stored.
    /// All pages of a document share it, so any one row is enough.
    pub fn stored_fingerprint(&self, path: &str) -> Result<Option<Fingerprint>> {
        let hash: Option<String> = self
            .conn
            .query_row(
                "SELECT hash FROM pdfs WHERE path = ?1 LIMIT 1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash.map(Fingerprint::from_hex))
    }

    /// Replace every page of `path` with `pages` (1-indexed) in one
    /// transaction. On error nothing is changed.
    pub fn upsert_document(
        &mut self,
        path: &str,
        fingerprint: &Fingerprint,
        pages: &[String],
    ) -> Result<usize> {
        debug!("Upserting {} ({} pages)", path, pages.len());

        let replace = |conn: &mut Connection| -> rusqlite::Result<usize> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM pdfs WHERE path = ?1", params![path])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO pdfs (path, page_num, hash, content, last_scanned)
                     VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)",
                )?;
                for (idx, content) in pages.iter().enumerate() {
                    stmt.execute(params![path, (idx + 1) as i64, fingerprint.as_str(), content])?;
                }
            }
            tx.commit()?;
            Ok(pages.len())
        };

        replace(&mut self.conn).map_err(|source| Error::StoreTransaction {
            path: path.to_string(),
            source,
        })
    }

    /// Change one page's text in place. Returns false if the page does not exist.
    pub fn update_page_content(&self, path: &str, page_num: PageNum, content: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE pdfs SET content = ?3 WHERE path = ?1 AND page_num = ?2",
                params![path, page_num as i64, content],
            )
            .map_err(|source| Error::StoreTransaction {
                path: path.to_string(),
                source,
            })?;
        Ok(changed > 0)
    }

    /// Stored pages of one document in page order
    pub fn pages(&self, path: &str) -> Result<Vec<Page>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, page_num, hash, content, last_scanned
             FROM pdfs WHERE path = ?1 ORDER BY page_num",
        )?;
        let pages = stmt
            .query_map(params![path], |row| {
                Ok(Page {
                    path: row.get(0)?,
                    page_num: row.get::<_, i64>(1)? as PageNum,
                    fingerprint: Fingerprint::from_hex(row.get::<_, String>(2)?),
                    content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    last_scanned: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pages)
    }

    /// Index rows for one document in page order
    pub fn index_entries(&self, path: &str) -> Result<Vec<IndexEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, CAST(page_num AS INTEGER), content_idx
             FROM pdfs_fts WHERE path = ?1 ORDER BY CAST(page_num AS INTEGER)",
        )?;
        let entries = stmt
            .query_map(params![path], |row| {
                Ok(IndexEntry {
                    path: row.get(0)?,
                    page_num: row.get::<_, i64>(1)? as PageNum,
                    content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Every stored document with its page count, in path order
    pub fn documents(&self) -> Result<Vec<DocumentSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, COUNT(*) FROM pdfs GROUP BY path ORDER BY path")?;
        let docs = stmt
            .query_map([], |row| {
                Ok(DocumentSummary {
                    path: row.get(0)?,
                    page_count: row.get::<_, i64>(1)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(docs)
    }

    pub fn document_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(DISTINCT path) FROM pdfs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn page_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pdfs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn index_entry_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pdfs_fts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
