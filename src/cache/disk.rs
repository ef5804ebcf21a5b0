//! Disk Store Module
//!
//! The persistent tier: one JSON file per key under the cache directory,
//! alive across process restarts.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs as async_fs;
use tracing::{debug, warn};

use crate::cache::entry::CacheEntry;
use crate::cache::keys;
use crate::error::{CacheError, Result};

// == Disk Store ==
/// On-disk storage tier.
///
/// Entries written here survive restarts; any engine pointed at the same
/// directory shares them. Files are replaced in place with a single
/// write, so a reader in another process can observe a torn write. That
/// race is accepted and documented (no lock files, no temp-file renames).
///
/// Every operation comes in a blocking (`std::fs`) and a non-blocking
/// (`tokio::fs`) form; both funnel through the same encode/decode and
/// error-classification helpers.
#[derive(Debug)]
pub struct DiskStore {
    /// Directory holding one `<key>.json` file per entry
    dir: PathBuf,
}

impl DiskStore {
    // == Constructor ==
    /// Opens the store, creating its directory recursively if absent.
    ///
    /// Creation is idempotent: an existing directory is not an error.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        debug!(dir = %dir.display(), "cache directory ensured");
        Ok(Self { dir })
    }

    /// Directory this store keeps its entry files in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // == Write ==
    /// Persists `entry` under `key`, fully replacing any prior content.
    pub fn write_sync(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let path = keys::entry_path(&self.dir, key);
        let bytes = encode(entry)?;
        fs::write(&path, bytes).map_err(|e| io_error(&path, e))
    }

    /// Non-blocking form of [`DiskStore::write_sync`].
    pub async fn write(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let path = keys::entry_path(&self.dir, key);
        let bytes = encode(entry)?;
        async_fs::write(&path, bytes)
            .await
            .map_err(|e| io_error(&path, e))
    }

    // == Read ==
    /// Loads the entry for `key`.
    ///
    /// A missing file is a plain miss (`None`); content that no longer
    /// decodes as an entry is a hard [`CacheError::Corrupt`].
    pub fn read_sync(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = keys::entry_path(&self.dir, key);
        match fs::read(&path) {
            Ok(bytes) => decode(key, &bytes).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Non-blocking form of [`DiskStore::read_sync`].
    pub async fn read(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = keys::entry_path(&self.dir, key);
        match async_fs::read(&path).await {
            Ok(bytes) => decode(key, &bytes).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    // == Remove ==
    /// Deletes the entry file for `key`; a missing file is not an error.
    pub fn remove_sync(&self, key: &str) -> Result<()> {
        let path = keys::entry_path(&self.dir, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Non-blocking form of [`DiskStore::remove_sync`].
    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = keys::entry_path(&self.dir, key);
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    // == Keys ==
    /// Lists the logical keys of every persisted entry, expired or not.
    ///
    /// Foreign files in the directory (names no valid key maps to) are
    /// ignored. No ordering is guaranteed.
    pub fn keys_sync(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for item in fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))? {
            let item = item.map_err(|e| io_error(&self.dir, e))?;
            collect_key(&item.file_name(), &mut found);
        }
        Ok(found)
    }

    /// Non-blocking form of [`DiskStore::keys_sync`].
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut entries = async_fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        while let Some(item) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            collect_key(&item.file_name(), &mut found);
        }
        Ok(found)
    }

    // == Wipe ==
    /// Removes the entire cache directory tree.
    ///
    /// A directory that is already gone counts as success, so teardown is
    /// idempotent.
    pub fn wipe_sync(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "cache directory removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.dir, e)),
        }
    }

    /// Non-blocking form of [`DiskStore::wipe_sync`].
    pub async fn wipe(&self) -> Result<()> {
        match async_fs::remove_dir_all(&self.dir).await {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "cache directory removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.dir, e)),
        }
    }
}

// == Shared Helpers ==
// Both I/O flavors funnel through these, so the blocking and non-blocking
// forms cannot drift apart in how they encode entries or classify errors.

fn encode(entry: &CacheEntry) -> Result<Vec<u8>> {
    serde_json::to_vec(entry).map_err(CacheError::Serialization)
}

fn decode(key: &str, bytes: &[u8]) -> Result<CacheEntry> {
    serde_json::from_slice(bytes).map_err(|source| {
        warn!(key = %key, "persisted cache entry failed to decode");
        CacheError::Corrupt {
            key: key.to_string(),
            source,
        }
    })
}

fn collect_key(name: &OsStr, found: &mut Vec<String>) {
    if let Some(key) = name.to_str().and_then(keys::key_from_file_name) {
        found.push(key.to_string());
    }
}

fn io_error(path: &Path, source: io::Error) -> CacheError {
    CacheError::Storage {
        path: path.to_path_buf(),
        source,
    }
}
