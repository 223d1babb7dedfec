//! On-disk schema: the page table, its full-text index, and the three
//! triggers that keep the index in lockstep with the pages.

use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::debug;

pub const FTS_TABLE: &str = "pdfs_fts";

const PAGES_DDL: &str = "
    CREATE TABLE IF NOT EXISTS pdfs (
        path TEXT NOT NULL,
        page_num INTEGER NOT NULL,
        hash TEXT NOT NULL,
        content TEXT,
        last_scanned TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (path, page_num)
    );
    CREATE INDEX IF NOT EXISTS idx_pdfs_hash ON pdfs (hash);
    CREATE INDEX IF NOT EXISTS idx_pdfs_path ON pdfs (path);
";

const FTS_DDL: &str = "
    CREATE VIRTUAL TABLE IF NOT EXISTS pdfs_fts USING fts5(
        path UNINDEXED,
        page_num UNINDEXED,
        content_idx,
        tokenize = 'unicode61'
    );
";

/// Propagation rules, in (name, ddl) form
const TRIGGERS: [(&str, &str); 3] = [
    (
        "pdfs_after_insert",
        "CREATE TRIGGER IF NOT EXISTS pdfs_after_insert
         AFTER INSERT ON pdfs
         BEGIN
             INSERT INTO pdfs_fts (path, page_num, content_idx) VALUES (new.path, new.page_num, new.content);
         END;",
    ),
    (
        "pdfs_after_delete",
        "CREATE TRIGGER IF NOT EXISTS pdfs_after_delete
         AFTER DELETE ON pdfs
         BEGIN
             DELETE FROM pdfs_fts WHERE path = old.path AND page_num = old.page_num;
         END;",
    ),
    (
        "pdfs_after_update_content",
        "CREATE TRIGGER IF NOT EXISTS pdfs_after_update_content
         AFTER UPDATE OF content ON pdfs
         WHEN new.content IS NOT old.content
         BEGIN
             UPDATE pdfs_fts SET content_idx = new.content WHERE path = new.path AND page_num = new.page_num;
         END;",
    ),
];

/// Connection settings applied to every handle
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|source| Error::SchemaInit {
        step: "configuring connection",
        source,
    })
}

/// Create every table, index and trigger that does not exist yet
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(PAGES_DDL).map_err(|source| Error::SchemaInit {
        step: "creating pdfs table",
        source,
    })?;
    create_fts_table(conn)?;
    create_triggers(conn)
}

/// Works on a plain connection or, through deref, on a transaction.
pub fn create_fts_table(conn: &Connection) -> Result<()> {
    debug!("Ensuring FTS table {} exists", FTS_TABLE);
    conn.execute_batch(FTS_DDL).map_err(|source| Error::SchemaInit {
        step: "creating pdfs_fts table",
        source,
    })
}

pub fn create_triggers(conn: &Connection) -> Result<()> {
    for (name, ddl) in TRIGGERS {
        debug!(trigger = name, "Ensuring trigger exists");
        conn.execute_batch(ddl).map_err(|source| Error::SchemaInit {
            step: name,
            source,
        })?;
    }
    Ok(())
}

/// Drop the triggers first so no propagation fires against a missing table.
pub fn drop_index(conn: &Connection) -> rusqlite::Result<()> {
    for (name, _) in TRIGGERS {
        debug!(trigger = name, "Dropping trigger");
        conn.execute_batch(&format!("DROP TRIGGER IF EXISTS {name};"))?;
    }
    debug!("Dropping FTS table {}", FTS_TABLE);
    conn.execute_batch("DROP TABLE IF EXISTS pdfs_fts;")
}

/// Propagation triggers that are not installed; empty when the index is
/// kept in lockstep with the pages.
pub fn missing_triggers(conn: &Connection) -> rusqlite::Result<Vec<&'static str>> {
    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'trigger' AND tbl_name = 'pdfs' AND name = ?1",
    )?;
    let mut missing = Vec::new();
    for (name, _) in TRIGGERS {
        let count: i64 = stmt.query_row([name], |row| row.get(0))?;
        if count == 0 {
            missing.push(name);
        }
    }
    Ok(missing)
}
