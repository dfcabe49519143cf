//! SyncMap Unit Tests
//!
//! Concurrent safety and early-exit iteration for the registry's map.

#[cfg(test)]
mod tests {
    use crate::syncmap::SyncMap;
    use proptest::prelude::*;
    use std::{collections::HashMap, sync::Arc, thread};

    fn letters(count: u8) -> SyncMap<String, i32> {
        let map = SyncMap::new();
        for i in 0..count {
            map.put(((b'a' + i) as char).to_string(), i as i32);
        }
        map
    }

    #[test]
    fn test_put_get_delete_size() {
        let map: SyncMap<String, i32> = SyncMap::new();
        assert!(map.is_empty());

        assert_eq!(map.put("a".to_string(), 1), None);
        assert_eq!(map.put("a".to_string(), 2), Some(1));
        assert_eq!(map.get("a"), Some(2));
        assert_eq!(map.size(), 1);
        assert!(map.contains_key("a"));

        assert_eq!(map.delete("a"), Some(2));
        assert_eq!(map.get("a"), None);
        assert_eq!(map.delete("a"), None);
        assert_eq!(map.size(), 0);
    }

    #[test]
    fn test_range_early_exit() {
        let map = letters(10);

        let mut count = 0;
        map.range(|_, _| {
            count += 1;
            count < 5
        });

        assert_eq!(count, 5, "range should stop after the fifth item");
    }

    #[test]
    fn test_range_visits_exactly_n_items() {
        let map = letters(10);

        for n in 0..=10usize {
            let mut visited = 0usize;
            map.range(|_, _| {
                if visited == n {
                    return false;
                }
                visited += 1;
                true
            });
            assert_eq!(visited, n);
        }
    }

    #[test]
    fn test_range_with_empty_map() {
        let map: SyncMap<String, i32> = SyncMap::new();

        let mut count = 0;
        map.range(|_, _| {
            count += 1;
            true
        });

        assert_eq!(count, 0);
    }

    #[test]
    fn test_range_allows_reentrant_reads() {
        let map = letters(8);

        let mut seen = 0;
        map.range(|key, value| {
            // Reading the map from inside the callback must not deadlock
            assert_eq!(map.get(key.as_str()), Some(*value));
            assert_eq!(map.size(), 8);
            seen += 1;
            true
        });

        assert_eq!(seen, 8);
    }

    #[test]
    fn test_concurrent_range_put_delete_size() {
        let map = Arc::new(letters(10));
        let mut handles = Vec::new();

        let writer = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                writer.put(((b'A' + (i % 26) as u8) as char).to_string(), i);
            }
        }));

        let reader = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                let mut count = 0;
                reader.range(|_, _| {
                    count += 1;
                    true
                });
                assert!(count <= 36);
            }
        }));

        let deleter = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                deleter.delete(((b'a' + (i % 10) as u8) as char).to_string().as_str());
            }
        }));

        let sizer = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for _ in 0..1_000 {
                assert!(sizer.size() <= 36);
            }
        }));

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        let mut counted = 0;
        map.range(|_, _| {
            counted += 1;
            true
        });
        assert_eq!(map.size(), counted);
        assert_eq!(map.size(), 26, "all lowercase keys deleted, all uppercase present");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, i32),
        Delete(u8),
        Get(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16, any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
            (0u8..16).prop_map(Op::Delete),
            (0u8..16).prop_map(Op::Get),
        ]
    }

    proptest! {
        #[test]
        fn prop_sequential_ops_match_hashmap(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let map: SyncMap<u8, i32> = SyncMap::new();
            let mut model: HashMap<u8, i32> = HashMap::new();

            for op in ops {
                match op {
                    Op::Put(k, v) => prop_assert_eq!(map.put(k, v), model.insert(k, v)),
                    Op::Delete(k) => prop_assert_eq!(map.delete(&k), model.remove(&k)),
                    Op::Get(k) => prop_assert_eq!(map.get(&k), model.get(&k).copied()),
                }
            }

            prop_assert_eq!(map.size(), model.len());
            let mut snapshot = map.snapshot();
            snapshot.sort();
            let mut expected: Vec<_> = model.into_iter().collect();
            expected.sort();
            prop_assert_eq!(snapshot, expected);
        }

        #[test]
        fn prop_concurrent_ops_leave_size_consistent(
            batches in prop::collection::vec(prop::collection::vec(op_strategy(), 0..50), 1..5)
        ) {
            let map: Arc<SyncMap<u8, i32>> = Arc::new(SyncMap::new());

            let handles: Vec<_> = batches
                .into_iter()
                .map(|ops| {
                    let map = Arc::clone(&map);
                    thread::spawn(move || {
                        for op in ops {
                            match op {
                                Op::Put(k, v) => {
                                    map.put(k, v);
                                }
                                Op::Delete(k) => {
                                    map.delete(&k);
                                }
                                Op::Get(k) => {
                                    map.get(&k);
                                }
                            }
                            map.range(|_, _| true);
                        }
                    })
                })
                .collect();

            for handle in handles {
                prop_assert!(handle.join().is_ok());
            }

            let mut counted = 0;
            map.range(|_, _| {
                counted += 1;
                true
            });
            prop_assert_eq!(map.size(), counted);
        }
    }
}
