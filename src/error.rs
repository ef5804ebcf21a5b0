//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! Only hard failures live here. A missing or expired entry is not an
//! error: read operations surface it as `Ok(None)` so callers can always
//! tell "no value" apart from a genuine storage or decoding failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key rejected before touching either tier (empty, too long, or
    /// containing a path separator / extension delimiter)
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The offending key
        key: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Value could not be encoded; neither tier has been modified
    #[error("failed to serialize value: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Persisted content exists but cannot be decoded back into an entry
    #[error("corrupt cache entry for key {key:?}: {source}")]
    Corrupt {
        /// Key whose stored entry is unreadable
        key: String,
        /// The underlying decode failure
        source: serde_json::Error,
    },

    /// Filesystem operation failed for a reason other than "not found"
    #[error("storage failure at {}: {source}", .path.display())]
    Storage {
        /// Path the operation was acting on
        path: PathBuf,
        /// The underlying I/O failure
        source: io::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
