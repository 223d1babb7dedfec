use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "pdf-fts";
const CONFIG_FILE: &str = "config.json";

/// Largest context window the FTS5 `snippet()` function accepts
pub const MAX_SNIPPET_TOKENS: u32 = 64;

/// Markers and context size passed to the FTS5 `snippet()` function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetStyle {
    pub start: String,
    pub end: String,
    pub ellipsis: String,
    pub tokens: u32,
}

impl SnippetStyle {
    /// Markers used for one-shot `search` output
    pub fn batch() -> Self {
        Self {
            start: "[HL]".to_string(),
            end: "[/HL]".to_string(),
            ellipsis: "...".to_string(),
            tokens: 25,
        }
    }

    /// Markers used for interactive live search
    pub fn live() -> Self {
        Self {
            start: ">>>".to_string(),
            end: "<<<".to_string(),
            ellipsis: " ... ".to_string(),
            tokens: 15,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start.is_empty() || self.end.is_empty() {
            return Err(Error::Config("highlight markers must not be empty".to_string()));
        }
        if self.start == self.end {
            return Err(Error::Config(
                "highlight start and end markers must differ".to_string(),
            ));
        }
        if self.tokens == 0 || self.tokens > MAX_SNIPPET_TOKENS {
            return Err(Error::Config(format!(
                "snippet token window must be between 1 and {}, got {}",
                MAX_SNIPPET_TOKENS, self.tokens
            )));
        }
        Ok(())
    }
}

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store file searched for in the working directory and its ancestors
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,

    /// Document extension (case-insensitive, without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Skip hidden and git-ignored files while crawling
    #[serde(default)]
    pub respect_ignore_files: bool,

    #[serde(default = "SnippetStyle::batch")]
    pub search_snippet: SnippetStyle,

    #[serde(default = "SnippetStyle::live")]
    pub live_snippet: SnippetStyle,

    /// Rows fetched per live query
    #[serde(default = "default_live_limit")]
    pub live_limit: usize,
}

fn default_db_file_name() -> String {
    "fts.db".to_string()
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_live_limit() -> usize {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_file_name: default_db_file_name(),
            extension: default_extension(),
            respect_ignore_files: false,
            search_snippet: SnippetStyle::batch(),
            live_snippet: SnippetStyle::live(),
            live_limit: default_live_limit(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<PathBuf> {
        let path = get_config_path()
            .ok_or_else(|| Error::Config("could not determine app data directory".to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_file_name.is_empty() || self.db_file_name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "db_file_name must be a plain file name, got '{}'",
                self.db_file_name
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Error::Config("extension must not be empty".to_string()));
        }
        self.search_snippet.validate()?;
        self.live_snippet.validate()
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_app_data_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Per-user application data directory (not created)
pub fn get_app_data_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };
    base.map(|b| b.join(APP_NAME))
}

/// Look for `file_name` in `start` and each of its ancestors
pub fn find_database(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(file_name);
        debug!("Searching for database at {}", candidate.display());
        if candidate.is_file() {
            debug!("Found database at {}", candidate.display());
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Resolve the store file for a command.
///
/// With `create`, a missing store resolves to `<start>/<file_name>`;
/// without it, a missing store is an error.
pub fn locate_database(start: &Path, file_name: &str, create: bool) -> Result<PathBuf> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()?.join(start)
    };

    if let Some(found) = find_database(&start, file_name) {
        return Ok(found);
    }
    if create {
        return Ok(start.join(file_name));
    }
    Err(Error::DatabaseNotFound {
        start,
        file_name: file_name.to_string(),
    })
}
