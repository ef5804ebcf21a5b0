//! Cache Keys Module
//!
//! Key validation and the key <-> file-name mapping used by the
//! persistent tier.
//!
//! Over the allowed key set the mapping `key -> <key>.json` is total and
//! invertible, so enumeration can recover every logical key from a
//! directory listing without guessing.

use std::path::{Path, PathBuf};

use crate::cache::{ENTRY_FILE_SUFFIX, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};

// == Validation ==
/// Validates a key before it reaches either tier.
///
/// Rejected up front instead of being handed to the filesystem: empty
/// keys, keys longer than [`MAX_KEY_LENGTH`] bytes, and keys containing a
/// path separator or the extension delimiter. The last two rules keep the
/// file-name mapping unambiguous and close the directory-escape hole a
/// key like `"../x"` would otherwise open.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key must not be empty"
    } else if key.len() > MAX_KEY_LENGTH {
        "key exceeds the maximum length"
    } else if key.contains(['/', '\\']) {
        "key must not contain path separators"
    } else if key.contains('.') {
        "key must not contain the extension delimiter"
    } else {
        return Ok(());
    };

    Err(CacheError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

// == Key -> File ==
/// File name a key's entry is stored under.
pub fn file_name_for(key: &str) -> String {
    format!("{}{}", key, ENTRY_FILE_SUFFIX)
}

/// Full path of the file a key's entry is stored at.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(file_name_for(key))
}

// == File -> Key ==
/// Inverse of the key -> file-name mapping.
///
/// Returns the logical key only for names that a valid key maps to;
/// foreign files in the cache directory (wrong suffix, or a stem no valid
/// key produces) yield `None` and are skipped by enumeration.
pub fn key_from_file_name(name: &str) -> Option<&str> {
    let key = name.strip_suffix(ENTRY_FILE_SUFFIX)?;
    validate_key(key).ok()?;
    Some(key)
}
