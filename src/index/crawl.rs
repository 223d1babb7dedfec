//! Document discovery.

use crate::error::{Error, Result};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Walks root directories for files with the document extension
pub struct Crawler {
    extension: String,
    respect_ignore_files: bool,
}

impl Crawler {
    pub fn new(extension: &str, respect_ignore_files: bool) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
            respect_ignore_files,
        }
    }

    /// True if the file name ends in `.<extension>`, ignoring case
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| {
                let name = name.to_string_lossy().to_lowercase();
                name.len() > self.extension.len() + 1
                    && name.ends_with(&self.extension)
                    && name[..name.len() - self.extension.len()].ends_with('.')
            })
            .unwrap_or(false)
    }

    /// Walk every root and return matching files, sorted by path.
    ///
    /// Symlinked files are kept under the link's own path; symlinked
    /// directories are not descended into. Unreadable entries and dangling
    /// links are logged and skipped; they never stop the walk.
    pub fn discover(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let Some((first, rest)) = roots.split_first() else {
            return Vec::new();
        };

        let mut builder = WalkBuilder::new(first);
        for root in rest {
            builder.add(root);
        }
        builder
            .standard_filters(self.respect_ignore_files)
            .follow_links(false);

        let mut found = Vec::new();
        for entry in builder.build() {
            let result = entry
                .map_err(|err| walk_error(&err))
                .and_then(|entry| self.accept(entry));
            match result {
                Ok(Some(path)) => {
                    debug!("Discovered {}", path.display());
                    found.push(path);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("Error accessing entry during discovery: {}", err);
                }
            }
        }

        found.sort();
        found.dedup();
        found
    }

    /// Matching regular file, or a matching link that resolves to one
    fn accept(&self, entry: DirEntry) -> Result<Option<PathBuf>> {
        let Some(file_type) = entry.file_type() else {
            return Ok(None);
        };
        if file_type.is_dir() || !self.matches(entry.path()) {
            return Ok(None);
        }
        if file_type.is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => return Ok(None),
                Err(err) => {
                    return Err(Error::Discovery {
                        path: entry.into_path(),
                        message: err.to_string(),
                    });
                }
            }
        } else if !file_type.is_file() {
            return Ok(None);
        }
        Ok(Some(entry.into_path()))
    }
}

/// Attach the offending path, when the walker knows it
fn walk_error(err: &ignore::Error) -> Error {
    match err {
        ignore::Error::WithPath { path, err } => Error::Discovery {
            path: path.clone(),
            message: err.to_string(),
        },
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error(err)
        }
        ignore::Error::Loop { child, .. } => Error::Discovery {
            path: child.clone(),
            message: err.to_string(),
        },
        other => Error::Discovery {
            path: PathBuf::new(),
            message: other.to_string(),
        },
    }
}
