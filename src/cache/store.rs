//! Cache Store Module
//!
//! The cache engine: composes the memory and disk tiers behind one
//! write-through interface, with blocking and non-blocking duals of every
//! operation.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::disk::DiskStore;
use crate::cache::entry::CacheEntry;
use crate::cache::keys;
use crate::cache::memory::MemoryStore;
use crate::config::{CacheConfig, CacheOptions};
use crate::error::{CacheError, Result};

// == Cache ==
/// Namespaced, time-bounded two-tier key-value cache.
///
/// Reads consult the memory tier first and fall back to disk on a miss;
/// writes go through every enabled tier. Nothing is promoted between
/// tiers on read. All operations take `&self`; wrap the engine in an
/// `Arc` to share it across tasks.
///
/// Engines constructed over the same base and namespace share only the
/// persistent directory; each keeps a private memory store. That shared
/// directory is how cached data survives restarts: a fresh engine reads
/// entries a previous one wrote. No locking is performed against other
/// instances or processes; concurrent writers race last-write-wins per
/// tier, and a reader in another process may observe a torn file write.
#[derive(Debug)]
pub struct Cache {
    /// Resolved configuration (immutable for the engine's lifetime)
    config: CacheConfig,
    /// In-process tier, present while the memory flag is set
    memory: Option<MemoryStore>,
    /// On-disk tier, present while the persist flag is set
    disk: Option<DiskStore>,
}

impl Cache {
    // == Constructor ==
    /// Builds an engine from (possibly partial) options.
    ///
    /// When persistence is enabled, the cache directory is created here,
    /// recursively and idempotently. Nothing else touches the filesystem
    /// at construction, and with persistence disabled no directory is
    /// ever created.
    pub fn new(options: CacheOptions) -> Result<Self> {
        let config = CacheConfig::resolve(options);

        let memory = config.memory.then(MemoryStore::new);
        let disk = if config.persist {
            Some(DiskStore::open(config.cache_dir().to_path_buf())?)
        } else {
            None
        };

        debug!(
            namespace = %config.name,
            memory = config.memory,
            persist = config.persist,
            "cache engine ready"
        );

        Ok(Self {
            config,
            memory,
            disk,
        })
    }

    /// Resolved configuration this engine runs with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Directory the persistent tier stores one file per key in.
    pub fn cache_dir(&self) -> &Path {
        self.config.cache_dir()
    }

    // == Put ==
    /// Stores `value` under `key` in every enabled tier.
    ///
    /// The key is validated and the value serialized before either tier
    /// is touched, so a rejected key or unencodable value leaves the
    /// cache exactly as it was. The disk tier is written first; if that
    /// write fails the error surfaces immediately and the memory tier is
    /// not reached. Tiers are never rolled back on each other's behalf.
    ///
    /// A later `put` with the same key fully replaces the prior entry and
    /// restarts its TTL.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let entry = self.entry_for_put(key, value)?;
        if let Some(disk) = &self.disk {
            disk.write(key, &entry).await?;
        }
        self.store_in_memory(key, entry);
        Ok(())
    }

    /// Blocking form of [`Cache::put`]: identical semantics, returning
    /// only once every enabled tier has been updated.
    pub fn put_sync<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let entry = self.entry_for_put(key, value)?;
        if let Some(disk) = &self.disk {
            disk.write_sync(key, &entry)?;
        }
        self.store_in_memory(key, entry);
        Ok(())
    }

    // == Get ==
    /// Looks `key` up, memory tier first.
    ///
    /// The three outcomes stay distinct: `Ok(Some(value))` on a live hit,
    /// `Ok(None)` when the key is absent or its entry has expired, and
    /// `Err` only for hard failures (unreadable storage, undecodable
    /// content). An expired entry found in memory answers the call with
    /// "no value" directly and is lazily purged; under write-through the
    /// disk copy is equally stale, so the file is not consulted. Reads
    /// never write one tier from the other.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        keys::validate_key(key)?;

        let payload = match self.read_from_memory(key) {
            Some(outcome) => outcome,
            None => match &self.disk {
                Some(disk) => Self::disk_outcome(disk.read(key).await?),
                None => None,
            },
        };

        payload
            .map(|payload| Self::decode_payload(key, payload))
            .transpose()
    }

    /// Blocking form of [`Cache::get`], preserving the same three-way
    /// outcome split.
    pub fn get_sync<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        keys::validate_key(key)?;

        let payload = match self.read_from_memory(key) {
            Some(outcome) => outcome,
            None => match &self.disk {
                Some(disk) => Self::disk_outcome(disk.read_sync(key)?),
                None => None,
            },
        };

        payload
            .map(|payload| Self::decode_payload(key, payload))
            .transpose()
    }

    // == Delete ==
    /// Removes `key` from every enabled tier.
    ///
    /// Absence anywhere is not an error, so deleting the same key twice
    /// succeeds both times. Only genuine filesystem failures surface.
    pub async fn delete(&self, key: &str) -> Result<()> {
        keys::validate_key(key)?;
        if let Some(memory) = &self.memory {
            memory.remove(key);
        }
        if let Some(disk) = &self.disk {
            disk.remove(key).await?;
        }
        Ok(())
    }

    /// Blocking form of [`Cache::delete`].
    pub fn delete_sync(&self, key: &str) -> Result<()> {
        keys::validate_key(key)?;
        if let Some(memory) = &self.memory {
            memory.remove(key);
        }
        if let Some(disk) = &self.disk {
            disk.remove_sync(key)?;
        }
        Ok(())
    }

    // == Keys ==
    /// Lists cached keys, in no particular order.
    ///
    /// While persistence is enabled the directory listing is the
    /// authoritative source, even when the memory tier is also active:
    /// the two hold the same set under normal write-through use, and the
    /// files are where divergence (out-of-band deletion) shows up. With
    /// persistence disabled the memory key set is returned instead.
    ///
    /// Expired entries are included: enumeration reflects "ever written,
    /// not yet removed". Call [`Cache::get`] to learn liveness.
    pub async fn keys(&self) -> Result<Vec<String>> {
        match &self.disk {
            Some(disk) => disk.keys().await,
            None => Ok(self.memory_keys()),
        }
    }

    /// Blocking form of [`Cache::keys`].
    pub fn keys_sync(&self) -> Result<Vec<String>> {
        match &self.disk {
            Some(disk) => disk.keys_sync(),
            None => Ok(self.memory_keys()),
        }
    }

    // == Unlink ==
    /// Tears the persistent tier down by removing the whole cache
    /// directory; already-gone counts as success.
    ///
    /// The memory tier is deliberately left untouched, and the directory
    /// is **not** recreated on demand afterwards: persisted writes and
    /// enumeration fail with [`CacheError::Storage`] until a fresh engine
    /// is constructed over the same base and namespace. With persistence
    /// disabled this reports success without any filesystem activity.
    pub async fn unlink(&self) -> Result<()> {
        match &self.disk {
            Some(disk) => disk.wipe().await,
            None => Ok(()),
        }
    }

    /// Blocking form of [`Cache::unlink`].
    pub fn unlink_sync(&self) -> Result<()> {
        match &self.disk {
            Some(disk) => disk.wipe_sync(),
            None => Ok(()),
        }
    }

    // == Shared Tier Logic ==
    // Each operation above is a blocking/non-blocking pair; everything
    // except the actual I/O call lives here so the two forms cannot
    // drift apart.

    /// Validates the key and serializes the value, before any tier is
    /// touched.
    fn entry_for_put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<CacheEntry> {
        keys::validate_key(key)?;
        let payload = serde_json::to_value(value).map_err(CacheError::Serialization)?;
        Ok(CacheEntry::new(payload, self.config.duration))
    }

    /// Mirrors a written entry into the memory tier.
    fn store_in_memory(&self, key: &str, entry: CacheEntry) {
        if let Some(memory) = &self.memory {
            memory.insert(key.to_string(), entry);
        }
    }

    /// Consults the memory tier. `Some(outcome)` means the tier answered
    /// (a live payload, or a known-stale "no value") and disk must not
    /// be consulted; `None` means the key is absent in memory.
    fn read_from_memory(&self, key: &str) -> Option<Option<Value>> {
        let memory = self.memory.as_ref()?;
        let entry = memory.get(key)?;

        if entry.is_expired() {
            debug!(key = %key, "expired entry purged from memory");
            memory.purge_expired(key);
            Some(None)
        } else {
            Some(Some(entry.payload))
        }
    }

    /// Applies liveness to an entry read from disk.
    fn disk_outcome(entry: Option<CacheEntry>) -> Option<Value> {
        entry.and_then(|entry| (!entry.is_expired()).then_some(entry.payload))
    }

    /// Decodes a payload back into the caller's type.
    fn decode_payload<T: DeserializeOwned>(key: &str, payload: Value) -> Result<T> {
        serde_json::from_value(payload).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    fn memory_keys(&self) -> Vec<String> {
        self.memory
            .as_ref()
            .map(MemoryStore::keys)
            .unwrap_or_default()
    }
}
