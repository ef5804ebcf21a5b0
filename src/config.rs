//! Configuration Module
//!
//! Handles resolving the partial options a host application passes in
//! into the immutable configuration a cache engine runs with.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used both for the default base and the default namespace.
const DEFAULT_NAME: &str = "cache";

// == Cache Options ==
/// Partial configuration accepted at engine construction.
///
/// Every field is optional; unset fields fall back to the defaults
/// documented on [`CacheConfig`]. Options are consumed once; the engine
/// keeps only the resolved form.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Root directory for persisted namespaces
    pub base: Option<PathBuf>,
    /// Namespace subdirectory under the base
    pub name: Option<String>,
    /// TTL applied to every entry at write time; `None` means entries
    /// never expire
    pub duration: Option<Duration>,
    /// Enable the in-process memory tier
    pub memory: bool,
    /// Enable the on-disk persistent tier
    pub persist: bool,
}

impl CacheOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory for persisted namespaces.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets the namespace subdirectory under the base.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the TTL applied to every entry at write time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Enables or disables the in-process memory tier.
    pub fn with_memory(mut self, enabled: bool) -> Self {
        self.memory = enabled;
        self
    }

    /// Enables or disables the on-disk persistent tier.
    pub fn with_persist(mut self, enabled: bool) -> Self {
        self.persist = enabled;
        self
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            base: None,
            name: None,
            duration: None,
            memory: true,
            persist: true,
        }
    }
}

// == Cache Config ==
/// Fully resolved engine configuration.
///
/// # Defaults
/// - `base` - a `cache` directory next to the host executable, or under
///   the working directory when the executable path is unknown
/// - `name` - `"cache"`
/// - `duration` - none (entries never expire)
/// - `memory` - enabled
/// - `persist` - enabled
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root directory for persisted namespaces
    pub base: PathBuf,
    /// Namespace subdirectory, isolating this cache's files from others
    /// sharing the same base
    pub name: String,
    /// TTL applied to every entry at write time
    pub duration: Option<Duration>,
    /// Whether the in-process memory tier is active
    pub memory: bool,
    /// Whether the on-disk persistent tier is active
    pub persist: bool,
    /// Derived `base/name` directory holding the persisted entries
    cache_dir: PathBuf,
}

impl CacheConfig {
    /// Resolves partial options into a complete configuration.
    ///
    /// Resolution is pure: the cache directory is derived but not created
    /// here (the engine creates it at construction when persistence is
    /// enabled).
    pub fn resolve(options: CacheOptions) -> Self {
        let base = options.base.unwrap_or_else(default_base);
        let name = options.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        let cache_dir = base.join(&name);

        Self {
            base,
            name,
            duration: options.duration,
            memory: options.memory,
            persist: options.persist,
            cache_dir,
        }
    }

    /// Directory the persistent tier stores one file per key in.
    ///
    /// Only exists on disk while persistence is enabled and the engine has
    /// not been torn down with `unlink`.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

/// Root for the default base directory: next to the host executable,
/// falling back to the working directory, then to `.`.
fn default_base() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_NAME)
}
