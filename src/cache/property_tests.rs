//! Property-Based Tests for the Cache Engine
//!
//! Uses proptest to verify the budget, LRU, and accounting properties hold
//! under arbitrary operation sequences.

use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::{normalize_key, CacheEngine};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 8;
const TEST_MAX_MEMORY: usize = 64;

fn test_engine() -> CacheEngine {
    let config = CacheConfig {
        max_entries: TEST_MAX_ENTRIES,
        max_memory_usage: TEST_MAX_MEMORY,
        max_file_size: TEST_MAX_MEMORY,
        ..CacheConfig::default()
    };
    CacheEngine::new(&config)
}

fn put(engine: &mut CacheEngine, key: &str, content: &str, modified: DateTime<Utc>) -> bool {
    engine.put(
        key.to_string(),
        PathBuf::from(key),
        Arc::from(content),
        modified,
    )
}

// == Strategies ==
/// Generates cache keys drawn from a small pool so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}\\.rs"
}

/// Generates content small enough to be cacheable under the test budget
fn content_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,16}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, content: String },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), content_strategy())
            .prop_map(|(key, content)| CacheOp::Put { key, content }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations, both budgets hold after every single
    // operation, not just at the end.
    #[test]
    fn prop_budgets_hold_after_every_operation(
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut engine = test_engine();
        let modified = Utc::now();

        for op in ops {
            match op {
                CacheOp::Put { key, content } => {
                    put(&mut engine, &key, &content, modified);
                }
                CacheOp::Get { key } => {
                    let _ = engine.get(&key, modified);
                }
                CacheOp::Invalidate { key } => {
                    let _ = engine.invalidate(&key);
                }
            }

            prop_assert!(
                engine.len() <= TEST_MAX_ENTRIES,
                "entry count {} exceeds budget {}",
                engine.len(),
                TEST_MAX_ENTRIES
            );
            prop_assert!(
                engine.total_bytes() <= TEST_MAX_MEMORY,
                "cached bytes {} exceed budget {}",
                engine.total_bytes(),
                TEST_MAX_MEMORY
            );
        }
    }

    // The stats counters reflect exactly the hits and misses observed by
    // callers, and the snapshot aggregates match the engine accessors.
    #[test]
    fn prop_stats_accuracy(
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let mut engine = test_engine();
        let modified = Utc::now();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, content } => {
                    put(&mut engine, &key, &content, modified);
                }
                CacheOp::Get { key } => {
                    match engine.get(&key, modified) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Invalidate { key } => {
                    let _ = engine.invalidate(&key);
                }
            }
        }

        let stats = engine.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, engine.len());
        prop_assert_eq!(stats.total_bytes, engine.total_bytes());
    }

    // A put immediately followed by a get with the same modification time
    // returns exactly the stored content.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), content in content_strategy()) {
        let mut engine = test_engine();
        let modified = Utc::now();

        prop_assume!(put(&mut engine, &key, &content, modified));

        let retrieved = engine.get(&key, modified);
        prop_assert_eq!(retrieved.as_deref(), Some(content.as_str()));
    }

    // Invalidating twice behaves like invalidating once: the second call
    // reports nothing removed and leaves the aggregates untouched.
    #[test]
    fn prop_invalidate_idempotence(key in key_strategy(), content in content_strategy()) {
        let mut engine = test_engine();
        let modified = Utc::now();
        put(&mut engine, &key, &content, modified);

        let first = engine.invalidate(&key);
        let len_after = engine.len();
        let bytes_after = engine.total_bytes();
        let second = engine.invalidate(&key);

        prop_assert!(first);
        prop_assert!(!second);
        prop_assert_eq!(engine.len(), len_after);
        prop_assert_eq!(engine.total_bytes(), bytes_after);
    }

    // Accessing a key always protects it from the next single eviction.
    #[test]
    fn prop_accessed_key_survives_next_eviction(
        keys in prop::collection::hash_set("[a-f]{2}\\.rs", 3..TEST_MAX_ENTRIES),
        new_key in "[g-k]{2}\\.rs",
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let modified = Utc::now();

        // fill a cache sized exactly to the key count
        let config = CacheConfig {
            max_entries: keys.len(),
            max_memory_usage: TEST_MAX_MEMORY,
            max_file_size: TEST_MAX_MEMORY,
            ..CacheConfig::default()
        };
        let mut engine = CacheEngine::new(&config);
        for key in &keys {
            put(&mut engine, key, "x", modified);
        }

        // the oldest key is next in line; touching it shifts the victim
        let protected = keys[0].clone();
        let expected_victim = keys[1].clone();
        engine.get(&protected, modified);

        put(&mut engine, &new_key, "x", modified);

        prop_assert!(engine.get(&protected, modified).is_some());
        prop_assert!(engine.get(&expected_victim, modified).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Normalization is idempotent: keys that already went through it come
    // out unchanged.
    #[test]
    fn prop_normalize_key_idempotent(path in "[a-zA-Z0-9_./\\\\]{0,40}") {
        let once = normalize_key(&path);
        let twice = normalize_key(&once);
        prop_assert_eq!(once, twice);
    }

    // Separator style and ASCII case never affect the key.
    #[test]
    fn prop_normalize_key_ignores_separator_and_case(path in "[a-zA-Z0-9_]{1,10}(/[a-zA-Z0-9_.]{1,10}){0,3}") {
        let backslashed = path.replace('/', "\\");
        let upper = path.to_ascii_uppercase();
        prop_assert_eq!(normalize_key(&path), normalize_key(&backslashed));
        prop_assert_eq!(normalize_key(&path), normalize_key(&upper));
    }
}
