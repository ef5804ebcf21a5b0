//! # Persistent Cache
//!
//! A namespaced, time-bounded key-value cache with two storage tiers: an
//! in-process memory map and an on-disk directory holding one JSON file
//! per key.
//!
//! ## Features
//!
//! - Write-through storage: every put lands in all enabled tiers
//! - Disk persistence that survives restarts (one `<key>.json` per entry)
//! - Optional time-to-live applied uniformly to every entry
//! - Blocking and non-blocking forms of every operation
//! - Either tier can be disabled independently
//!
//! ## Example
//!
//! ```rust,no_run
//! use persistent_cache::{Cache, CacheOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> persistent_cache::Result<()> {
//!     // Entries live under <base>/sessions and expire after one hour.
//!     let cache = Cache::new(
//!         CacheOptions::new()
//!             .with_name("sessions")
//!             .with_duration(Duration::from_secs(3600)),
//!     )?;
//!
//!     cache.put("user_123", &"John Doe").await?;
//!
//!     if let Some(name) = cache.get::<String>("user_123").await? {
//!         println!("user: {name}");
//!     }
//!
//!     cache.delete("user_123").await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, ENTRY_FILE_SUFFIX, MAX_KEY_LENGTH};
pub use config::{CacheConfig, CacheOptions};
pub use error::{CacheError, Result};
