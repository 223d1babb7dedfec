//! Explicit application handle: configuration plus the open store.
//!
//! Built once by the CLI and handed to the scan pipeline, the query engine
//! and the maintenance commands.

use crate::error::Result;
use crate::index::store::ContentStore;
use crate::utils::app_data::{AppConfig, locate_database};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a command wants the store resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Use an existing store or create one in the start directory (`scan`)
    OpenOrCreate,
    /// Require an existing store (`search`, `live`, `rebuild-fts`, `stats`)
    MustExist,
}

pub struct AppContext {
    pub config: AppConfig,
    pub store: ContentStore,
    db_path: PathBuf,
}

impl AppContext {
    /// Locate the store from `start` upwards and open it
    pub fn open(config: AppConfig, start: &Path, mode: StoreMode) -> Result<Self> {
        let db_path = locate_database(
            start,
            &config.db_file_name,
            mode == StoreMode::OpenOrCreate,
        )?;
        debug!("Using database at {}", db_path.display());
        let store = ContentStore::open(&db_path)?;
        Ok(Self {
            config,
            store,
            db_path,
        })
    }

    /// Open a store at an explicit location
    pub fn with_store_at(config: AppConfig, db_path: &Path) -> Result<Self> {
        let store = ContentStore::open(db_path)?;
        Ok(Self {
            config,
            store,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
