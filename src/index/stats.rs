use crate::context::AppContext;
use crate::error::Result;
use crate::index::sync::IndexSynchronizer;
use crate::index::types::SyncReport;
use serde::Serialize;
use std::path::Path;

/// Snapshot of the store for the `stats` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub documents: usize,
    pub pages: usize,
    pub index_entries: usize,
    /// Stored documents that no longer exist on disk (relative to the cwd)
    pub missing_on_disk: Vec<String>,
    pub size_bytes: Option<u64>,
    #[serde(skip)]
    pub sync: SyncReport,
}

/// Gather counts, the consistency audit and stale-document detection
pub fn collect_stats(ctx: &mut AppContext) -> Result<StoreStats> {
    let store = &ctx.store;
    let documents = store.documents()?;
    let missing_on_disk = documents
        .iter()
        .filter(|doc| !Path::new(&doc.path).exists())
        .map(|doc| doc.path.clone())
        .collect();

    let pages = store.page_count()?;
    let index_entries = store.index_entry_count()?;
    let size_bytes = store_size(ctx.db_path());
    let sync = IndexSynchronizer::new(&mut ctx.store).check()?;

    Ok(StoreStats {
        documents: documents.len(),
        pages,
        index_entries,
        missing_on_disk,
        size_bytes,
        sync,
    })
}

/// Display store statistics
pub fn show_stats(ctx: &mut AppContext) -> Result<()> {
    let stats = collect_stats(ctx)?;

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Database:         {}", ctx.db_path().display());
    if let Some(size) = stats.size_bytes {
        println!("Database size:    {}", format_size(size));
    }
    println!("Documents:        {}", stats.documents);
    println!("Pages:            {}", stats.pages);
    println!("Index entries:    {}", stats.index_entries);

    println!();
    if stats.sync.is_consistent() {
        println!("Index status:     in sync");
    } else {
        println!("Index status:     OUT OF SYNC (run 'rebuild-fts')");
        println!("  Missing entries:  {}", stats.sync.missing_entries);
        println!("  Orphan entries:   {}", stats.sync.orphan_entries);
        println!("  Mismatched:       {}", stats.sync.mismatched);
        if stats.sync.missing_triggers > 0 {
            println!("  Missing triggers: {}", stats.sync.missing_triggers);
        }
    }

    if !stats.missing_on_disk.is_empty() {
        println!();
        println!(
            "Documents no longer on disk: {}",
            stats.missing_on_disk.len()
        );
        for path in stats.missing_on_disk.iter().take(15) {
            println!("  {} [missing]", path);
        }
        if stats.missing_on_disk.len() > 15 {
            println!("  ... and {} more", stats.missing_on_disk.len() - 15);
        }
    }

    Ok(())
}

/// Database file plus its WAL and shared-memory siblings
pub(crate) fn store_size(db_path: &Path) -> Option<u64> {
    let main = std::fs::metadata(db_path).ok()?.len();
    let siblings: u64 = ["-wal", "-shm"]
        .iter()
        .filter_map(|suffix| {
            let mut name = db_path.as_os_str().to_owned();
            name.push(suffix);
            std::fs::metadata(Path::new(&name)).ok()
        })
        .map(|meta| meta.len())
        .sum();
    Some(main + siblings)
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
