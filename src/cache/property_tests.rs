//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check round-trips, call accounting and list ranges.

use std::sync::Arc;

use proptest::prelude::*;
use tokio_test::block_on;

use crate::cache::{InstrumentedCache, MemoryStore, Operation, Store, StoredValue};

// == Helpers ==
async fn new_cache() -> (Arc<MemoryStore>, InstrumentedCache) {
    let store = Arc::new(MemoryStore::new());
    let cache = InstrumentedCache::new(store.clone()).await.unwrap();
    (store, cache)
}

// == Strategies ==
/// Generates any stored value; floats stay finite so they compare equal.
fn stored_value_strategy() -> impl Strategy<Value = StoredValue> {
    prop_oneof![
        any::<i64>().prop_map(StoredValue::Integer),
        (-1.0e12f64..1.0e12).prop_map(StoredValue::Float),
        ".{0,64}".prop_map(StoredValue::Text),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(StoredValue::Bytes),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading back the raw bytes yields its encoding
    #[test]
    fn prop_roundtrip_raw(value in stored_value_strategy()) {
        let read = block_on(async {
            let (_, cache) = new_cache().await;
            let key = cache.store(value.clone()).await.unwrap();
            cache.get(&key).await.unwrap()
        });

        prop_assert_eq!(read, Some(value.to_bytes()));
    }

    // Text comes back unchanged through the text decoder
    #[test]
    fn prop_roundtrip_text(text in ".{0,128}") {
        let read = block_on(async {
            let (_, cache) = new_cache().await;
            let key = cache.store(StoredValue::Text(text.clone())).await.unwrap();
            cache.get_text(&key).await.unwrap()
        });

        prop_assert_eq!(read, Some(text));
    }

    // Integers and floats come back unchanged through their decoders
    #[test]
    fn prop_roundtrip_numbers(int in any::<i64>(), float in -1.0e12f64..1.0e12) {
        let (read_int, read_float) = block_on(async {
            let (_, cache) = new_cache().await;
            let int_key = cache.store(StoredValue::Integer(int)).await.unwrap();
            let float_key = cache.store(StoredValue::Float(float)).await.unwrap();
            (
                cache.get_integer(&int_key).await.unwrap(),
                cache.get_float(&float_key).await.unwrap(),
            )
        });

        prop_assert_eq!(read_int, Some(int));
        prop_assert_eq!(read_float, Some(float));
    }

    // After N stores the counter and both logs hold exactly N records
    #[test]
    fn prop_call_accounting(values in prop::collection::vec(stored_value_strategy(), 0..30)) {
        let n = values.len();
        let (calls, inputs, outputs, trace_len) = block_on(async {
            let (store, cache) = new_cache().await;
            for value in values {
                cache.store(value).await.unwrap();
            }
            let op = Operation::Store;
            (
                cache.call_count(op).await.unwrap(),
                store.range_read(&op.inputs_key(), 0, -1).await.unwrap().len(),
                store.range_read(&op.outputs_key(), 0, -1).await.unwrap().len(),
                cache.replay(op).await.unwrap().entries.len(),
            )
        });

        prop_assert_eq!(calls, n as i64);
        prop_assert_eq!(inputs, n);
        prop_assert_eq!(outputs, n);
        prop_assert_eq!(trace_len, n);
    }

    // Generated keys never collide
    #[test]
    fn prop_keys_are_unique(count in 1usize..50) {
        let keys = block_on(async {
            let (_, cache) = new_cache().await;
            let mut keys = std::collections::HashSet::new();
            for i in 0..count {
                keys.insert(cache.store(StoredValue::Integer(i as i64)).await.unwrap());
            }
            keys
        });

        prop_assert_eq!(keys.len(), count);
    }

    // Non-negative range reads match inclusive slicing
    #[test]
    fn prop_range_read_matches_slice(
        items in prop::collection::vec("[a-z]{1,8}", 0..20),
        start in 0usize..25,
        len in 0usize..25,
    ) {
        let end = start + len;
        let read = block_on(async {
            let store = MemoryStore::new();
            for item in &items {
                store.append_to_list("list", item.as_bytes().to_vec()).await.unwrap();
            }
            store.range_read("list", start as isize, end as isize).await.unwrap()
        });

        let expected: Vec<Vec<u8>> = items
            .iter()
            .skip(start)
            .take(end + 1 - start)
            .map(|s| s.as_bytes().to_vec())
            .collect();
        prop_assert_eq!(read, expected);
    }
}
