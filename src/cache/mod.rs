//! Cache Module
//!
//! Provides two-tier key-value caching: an in-process memory store and an
//! on-disk one-file-per-key store behind a single write-through engine,
//! with TTL expiration.

mod disk;
mod entry;
mod keys;
mod memory;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use disk::DiskStore;
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use store::Cache;

// == Public Constants ==
/// Maximum allowed key length in bytes; keeps `<key>.json` inside the
/// common 255-byte file name limit
pub const MAX_KEY_LENGTH: usize = 250;

/// Suffix appended to a key to form its entry file name
pub const ENTRY_FILE_SUFFIX: &str = ".json";
