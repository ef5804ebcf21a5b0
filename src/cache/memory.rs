//! Memory Store Module
//!
//! The process-local tier: a key -> entry map alive only for the engine's
//! lifetime.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::CacheEntry;

// == Memory Store ==
/// Process-local storage tier.
///
/// Each engine instance owns its own memory store; nothing is shared
/// across instances, even within the same process. The lock guards single
/// map operations and is never held across I/O or `.await` points.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Stores an entry under `key`, fully replacing any prior entry.
    pub fn insert(&self, key: String, entry: CacheEntry) {
        self.write().insert(key, entry);
    }

    // == Get ==
    /// Returns a copy of the entry for `key`, expired or not.
    ///
    /// Liveness is the engine's call; handing back expired entries lets it
    /// distinguish "present but stale" from "absent".
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.read().get(key).cloned()
    }

    // == Remove ==
    /// Removes the entry for `key`; absence is not an error.
    pub fn remove(&self, key: &str) {
        self.write().remove(key);
    }

    // == Purge Expired ==
    /// Removes the entry for `key` only if it is still expired.
    ///
    /// Liveness is re-checked under the write lock: a concurrent `put` may
    /// have replaced the entry after the reader observed it expired, and
    /// the fresh entry must survive.
    pub fn purge_expired(&self, key: &str) {
        let mut entries = self.write();
        if entries.get(key).map(|entry| entry.is_expired()).unwrap_or(false) {
            entries.remove(key);
        }
    }

    // == Keys ==
    /// Returns the current key set, in no particular order.
    ///
    /// Expired entries are included; enumeration reflects "ever written,
    /// not yet removed".
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    // A poisoned lock only means some writer panicked mid-call; a single
    // map operation cannot leave the map structurally invalid, so the
    // poison marker is ignored rather than propagated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
