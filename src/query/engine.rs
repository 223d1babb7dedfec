use crate::error::{Error, Result};
use crate::index::store::ContentStore;
use crate::index::types::{LiveHit, PageNum, SearchHit};
use crate::utils::app_data::SnippetStyle;
use rusqlite::params;
use tracing::debug;

/// Snippet column of `pdfs_fts` (path, page_num, content_idx)
const CONTENT_COLUMN: i64 = 2;

/// Read-only queries over the synchronized index.
///
/// The query string goes to the FTS5 `MATCH` operator unchanged, so the
/// full FTS5 query syntax (phrases, `AND`/`OR`/`NOT`, prefixes) is available.
pub struct QueryEngine<'a> {
    store: &'a ContentStore,
    batch_style: &'a SnippetStyle,
    live_style: &'a SnippetStyle,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        store: &'a ContentStore,
        batch_style: &'a SnippetStyle,
        live_style: &'a SnippetStyle,
    ) -> Self {
        Self {
            store,
            batch_style,
            live_style,
        }
    }

    /// Matching pages ordered by path then page number, at most `limit` rows
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        debug!("Search for '{}', limit {}", query, limit);
        let style = self.batch_style;

        let run = || -> rusqlite::Result<Vec<SearchHit>> {
            let mut stmt = self.store.connection().prepare(
                "SELECT p.path, p.page_num,
                        snippet(pdfs_fts, ?1, ?2, ?3, ?4, ?5) AS snippet,
                        p.last_scanned
                 FROM pdfs_fts
                 JOIN pdfs AS p ON pdfs_fts.path = p.path AND pdfs_fts.page_num = p.page_num
                 WHERE pdfs_fts MATCH ?6
                 ORDER BY p.path, p.page_num
                 LIMIT ?7",
            )?;
            let rows = stmt.query_map(
                params![
                    CONTENT_COLUMN,
                    style.start,
                    style.end,
                    style.ellipsis,
                    style.tokens as i64,
                    query,
                    sql_limit(limit)
                ],
                |row| {
                    Ok(SearchHit {
                        path: row.get(0)?,
                        page_num: row.get::<_, i64>(1)? as PageNum,
                        snippet: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        last_scanned: row.get(3)?,
                    })
                },
            )?;
            rows.collect()
        };

        run().map_err(|source| Error::Query {
            query: query.to_string(),
            source,
        })
    }

    /// Matching pages ordered by relevance, for interactive use.
    /// A blank query yields no rows rather than an error.
    pub fn live_search(&self, query: &str, limit: usize) -> Result<Vec<LiveHit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let style = self.live_style;

        let run = || -> rusqlite::Result<Vec<LiveHit>> {
            let mut stmt = self.store.connection().prepare(
                "SELECT p.path, p.page_num,
                        snippet(pdfs_fts, ?1, ?2, ?3, ?4, ?5) AS snippet
                 FROM pdfs_fts
                 JOIN pdfs AS p ON pdfs_fts.path = p.path AND pdfs_fts.page_num = p.page_num
                 WHERE pdfs_fts MATCH ?6
                 ORDER BY rank
                 LIMIT ?7",
            )?;
            let rows = stmt.query_map(
                params![
                    CONTENT_COLUMN,
                    style.start,
                    style.end,
                    style.ellipsis,
                    style.tokens as i64,
                    query,
                    sql_limit(limit)
                ],
                |row| {
                    Ok(LiveHit {
                        path: row.get(0)?,
                        page_num: row.get::<_, i64>(1)? as PageNum,
                        snippet: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                },
            )?;
            rows.collect()
        };

        run().map_err(|source| Error::Query {
            query: query.to_string(),
            source,
        })
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
