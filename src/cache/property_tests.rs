//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine's behavior against a simple
//! in-memory model across generated keys, payloads, and op sequences.

use proptest::prelude::*;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::thread::sleep;
use std::time::Duration;
use tempfile::{tempdir, TempDir};

use crate::cache::{Cache, MAX_KEY_LENGTH};
use crate::config::CacheOptions;
use crate::error::CacheError;

// == Strategies ==
/// Generates valid cache keys (non-empty, no separators or dots, within
/// the length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates keys every operation must reject
fn invalid_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,8}/[a-z]{1,8}".prop_map(|s| s),
        "[a-z]{1,8}\\.[a-z]{1,8}".prop_map(|s| s),
        "[a-z]{1,8}".prop_map(|s| format!("{s}\\tail")),
        Just("x".repeat(MAX_KEY_LENGTH + 1)),
    ]
}

/// Generates JSON payloads whose round trip compares exactly (no floats)
fn json_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,32}".prop_map(Value::from),
        prop::collection::vec(any::<i64>(), 0..6).prop_map(Value::from),
        prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..5)
            .prop_map(|fields| serde_json::to_value(fields).unwrap()),
    ]
}

/// Generates a sequence of cache operations for model testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: Value },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), json_value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn scratch_options(dir: &TempDir) -> CacheOptions {
    CacheOptions::new().with_base(dir.path()).with_name("props")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any valid key-value pair, storing the pair and then retrieving
    // it (before expiration) returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in json_value_strategy()) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(scratch_options(&dir)).unwrap();

        cache.put_sync(&key, &value).unwrap();

        let read: Value = cache.get_sync(&key).unwrap().unwrap();
        prop_assert_eq!(read, value, "round-trip value mismatch");
    }

    // For any key, storing V1 and then V2 under it leaves exactly one
    // entry, and reads return V2.
    #[test]
    fn prop_overwrite_returns_latest(
        key in valid_key_strategy(),
        first in json_value_strategy(),
        second in json_value_strategy()
    ) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(scratch_options(&dir)).unwrap();

        cache.put_sync(&key, &first).unwrap();
        cache.put_sync(&key, &second).unwrap();

        let read: Value = cache.get_sync(&key).unwrap().unwrap();
        prop_assert_eq!(read, second, "latest write should win");
        prop_assert_eq!(cache.keys_sync().unwrap().len(), 1, "overwrite must not add entries");
    }

    // For any stored key, a delete makes subsequent reads report "no
    // value" and removes the entry file.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in json_value_strategy()) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(scratch_options(&dir)).unwrap();

        cache.put_sync(&key, &value).unwrap();
        prop_assert!(
            cache.get_sync::<Value>(&key).unwrap().is_some(),
            "key should exist before delete"
        );

        cache.delete_sync(&key).unwrap();

        prop_assert!(
            cache.get_sync::<Value>(&key).unwrap().is_none(),
            "key should not exist after delete"
        );
        prop_assert!(
            cache.keys_sync().unwrap().is_empty(),
            "entry file should be gone after delete"
        );
    }

    // For any sequence of puts and deletes, the cache's enumeration and
    // readable values match a plain map driven by the same sequence.
    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(scratch_options(&dir)).unwrap();
        let mut model: HashMap<String, Value> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put_sync(&key, &value).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Delete { key } => {
                    cache.delete_sync(&key).unwrap();
                    model.remove(&key);
                }
            }
        }

        let cached: HashSet<String> = cache.keys_sync().unwrap().into_iter().collect();
        let expected: HashSet<String> = model.keys().cloned().collect();
        prop_assert_eq!(cached, expected, "enumeration diverged from the model");

        for (key, value) in &model {
            let read: Value = cache.get_sync(key).unwrap().unwrap();
            prop_assert_eq!(&read, value, "value diverged from the model for key {}", key);
        }
    }

    // For any set of entries written by one engine, a fresh engine over
    // the same base and namespace reads every one of them back.
    #[test]
    fn prop_entries_survive_reopen(
        entries in prop::collection::hash_map(valid_key_strategy(), json_value_strategy(), 1..12)
    ) {
        let dir = tempdir().unwrap();

        {
            let writer = Cache::new(scratch_options(&dir)).unwrap();
            for (key, value) in &entries {
                writer.put_sync(key, value).unwrap();
            }
        }

        let reader = Cache::new(scratch_options(&dir)).unwrap();
        for (key, value) in &entries {
            let read: Value = reader.get_sync(key).unwrap().unwrap();
            prop_assert_eq!(&read, value, "entry lost across engines for key {}", key);
        }
    }

    // For any malformed key, every operation rejects it up front and no
    // tier is touched.
    #[test]
    fn prop_rejected_keys_leave_no_trace(
        key in invalid_key_strategy(),
        value in json_value_strategy()
    ) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(scratch_options(&dir)).unwrap();

        prop_assert!(
            matches!(
                cache.put_sync(&key, &value),
                Err(CacheError::InvalidKey { .. })
            ),
            "put must reject the malformed key with InvalidKey"
        );
        prop_assert!(
            matches!(
                cache.get_sync::<Value>(&key),
                Err(CacheError::InvalidKey { .. })
            ),
            "get must reject the malformed key with InvalidKey"
        );
        prop_assert!(
            matches!(
                cache.delete_sync(&key),
                Err(CacheError::InvalidKey { .. })
            ),
            "delete must reject the malformed key with InvalidKey"
        );

        prop_assert!(
            cache.keys_sync().unwrap().is_empty(),
            "a rejected put must not create entries"
        );
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // For any entry written under a cache-wide TTL, reads report "no
    // value" once the TTL has elapsed, and keep doing so.
    #[test]
    fn prop_ttl_expiration(key in valid_key_strategy(), value in json_value_strategy()) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(
            scratch_options(&dir).with_duration(Duration::from_millis(30)),
        )
        .unwrap();

        cache.put_sync(&key, &value).unwrap();
        let before: Option<Value> = cache.get_sync(&key).unwrap();
        prop_assert_eq!(before.as_ref(), Some(&value), "entry should be live before the TTL elapses");

        sleep(Duration::from_millis(90));

        // First read finds the stale copy in memory, the second runs
        // after it has been purged; both must agree.
        let after: Option<Value> = cache.get_sync(&key).unwrap();
        prop_assert!(after.is_none(), "entry should have expired");
        let again: Option<Value> = cache.get_sync(&key).unwrap();
        prop_assert!(again.is_none(), "expiry must be stable across reads");
    }
}
