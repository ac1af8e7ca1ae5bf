//! Property-Based Tests for the TTL store

use proptest::prelude::*;

use crate::cache::TtlStore;

const TEST_DEFAULT_TTL: u64 = 300;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9:_-]{1,24}"
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: u32 },
    Get { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| StoreOp::Set { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hit and miss counters match the outcome of every lookup.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let mut store = TtlStore::new(32, TEST_DEFAULT_TTL);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                StoreOp::Set { key, value } => store.set(key, value, None),
                StoreOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, store.len());
    }

    // The most recent write for a key is what a lookup returns.
    #[test]
    fn prop_last_write_wins(key in key_strategy(), first in any::<u32>(), second in any::<u32>()) {
        let mut store = TtlStore::new(8, TEST_DEFAULT_TTL);
        store.set(key.clone(), first, None);
        store.set(key.clone(), second, None);

        prop_assert_eq!(store.get(&key), Some(second));
        prop_assert_eq!(store.len(), 1);
    }

    // The store never grows past its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), any::<u32>()), 1..200)
    ) {
        let max_entries = 20;
        let mut store = TtlStore::new(max_entries, TEST_DEFAULT_TTL);

        for (key, value) in entries {
            store.set(key, value, None);
            prop_assert!(store.len() <= max_entries);
        }
    }
}
