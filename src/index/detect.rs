//! Change detection by content fingerprint.
//!
//! Hashing the raw file is much cheaper than extracting its text, so every
//! candidate is fingerprinted first and only changed documents reach the
//! extractor.

use crate::error::{Error, Result};
use crate::index::store::ContentStore;
use crate::index::types::{ChangeStatus, Fingerprint};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io;
use std::path::Path;

/// Stream a file through SHA-1
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let wrap = |source: io::Error| Error::Fingerprint {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(wrap)?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher).map_err(wrap)?;
    Ok(Fingerprint::from_digest(&hasher.finalize()))
}

pub struct ChangeDetector<'a> {
    store: &'a ContentStore,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self { store }
    }

    /// Fingerprint `path` and compare it with what the store holds
    pub fn classify(&self, path: &Path, forced: bool) -> Result<(ChangeStatus, Fingerprint)> {
        let current = fingerprint_file(path)?;
        let status = self.compare(&path.to_string_lossy(), &current, forced)?;
        Ok((status, current))
    }

    /// Compare an already computed fingerprint with the stored one
    pub fn compare(&self, key: &str, current: &Fingerprint, forced: bool) -> Result<ChangeStatus> {
        let stored = self.store.stored_fingerprint(key)?;
        Ok(ChangeStatus::decide(stored.as_ref(), current, forced))
    }
}
