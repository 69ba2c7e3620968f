use probekv::{Engine, Error};

#[test]
fn put_get_delete_round_trip() {
    let engine = Engine::init(32).unwrap();
    engine.put(b"watermark", b"100").unwrap();
    engine.put(b"epoch", b"1").unwrap();
    assert_eq!(engine.get(b"watermark").unwrap(), b"100");
    assert_eq!(engine.get(b"epoch").unwrap(), b"1");

    engine.delete(b"watermark").unwrap();
    assert_eq!(engine.get(b"watermark"), Err(Error::NotFound));
    assert_eq!(engine.get(b"epoch").unwrap(), b"1");
}

#[test]
fn overwrite_keeps_item_count_stable() {
    let engine = Engine::init(16).unwrap();
    for v in 0..5u32 {
        engine.put(b"counter", &v.to_le_bytes()).unwrap();
        assert_eq!(engine.stats().item_count, 1);
    }
    assert_eq!(engine.get(b"counter").unwrap(), 4u32.to_le_bytes());
}

#[test]
fn grows_past_its_initial_capacity() {
    let engine = Engine::init(16).unwrap();
    let initial_capacity = engine.stats().capacity;
    for i in 0u32..200 {
        engine.put(&i.to_le_bytes(), &i.to_le_bytes()).unwrap();
    }
    assert!(engine.stats().capacity > initial_capacity);
    for i in 0u32..200 {
        assert_eq!(engine.get(&i.to_le_bytes()).unwrap(), i.to_le_bytes());
    }
    assert_eq!(engine.stats().item_count, 200);
}

#[test]
fn shrinks_after_mass_deletion() {
    let engine = Engine::init(16).unwrap();
    for i in 0u32..200 {
        engine.put(&i.to_le_bytes(), &i.to_le_bytes()).unwrap();
    }
    let grown_capacity = engine.stats().capacity;
    for i in 0u32..195 {
        engine.delete(&i.to_le_bytes()).unwrap();
    }
    assert!(engine.stats().capacity < grown_capacity);
    assert_eq!(engine.stats().item_count, 5);
    for i in 195u32..200 {
        assert_eq!(engine.get(&i.to_le_bytes()).unwrap(), i.to_le_bytes());
    }
}

#[test]
fn regressions() {
    // a handful of concrete (key, value) pairs that previously tripped
    // probe-chain bugs during development; kept as fixed regressions
    // rather than relying on property tests to rediscover them.
    let engine = Engine::init(16).unwrap();
    let cases: [(u32, u32); 3] = [(0, 0), (882_041_908, 7), (201_832_565, 3)];
    for (k, v) in cases {
        engine.put(&k.to_le_bytes(), &v.to_le_bytes()).unwrap();
        assert_eq!(engine.get(&k.to_le_bytes()).unwrap(), v.to_le_bytes());
        engine.delete(&k.to_le_bytes()).unwrap();
        assert_eq!(engine.get(&k.to_le_bytes()), Err(Error::NotFound));
    }
}

#[test]
fn delete_of_absent_key_is_not_found() {
    let engine = Engine::init(16).unwrap();
    assert_eq!(engine.delete(b"ghost"), Err(Error::NotFound));
}

#[test]
fn rejects_zero_length_key_or_value() {
    let engine = Engine::init(16).unwrap();
    assert!(matches!(engine.put(b"", b"v"), Err(Error::InvalidArgument(_))));
    assert!(matches!(engine.put(b"k", b""), Err(Error::InvalidArgument(_))));
    assert!(matches!(engine.get(b""), Err(Error::InvalidArgument(_))));
    assert!(matches!(engine.delete(b""), Err(Error::InvalidArgument(_))));
}

#[test]
fn concurrent_writers_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(Engine::init(16).unwrap());
    let mut handles = Vec::new();
    for t in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..50u32 {
                let key = format!("t{t}-k{i}");
                engine.put(key.as_bytes(), &i.to_le_bytes()).unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(engine.stats().item_count, 400);
    for t in 0..8 {
        for i in 0..50u32 {
            let key = format!("t{t}-k{i}");
            assert_eq!(engine.get(key.as_bytes()).unwrap(), i.to_le_bytes());
        }
    }
}

mod properties {
    use probekv::Engine;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig { cases: 32, ..Default::default() })]

        /// Every key put and then immediately read back returns the value
        /// just written.
        #[test]
        fn put_then_get_round_trips(
            pairs in prop::collection::vec((any::<u32>(), any::<u32>()), 1..200)
        ) {
            let engine = Engine::init(16).unwrap();
            for (k, v) in pairs {
                engine.put(&k.to_le_bytes(), &v.to_le_bytes()).unwrap();
                prop_assert_eq!(engine.get(&k.to_le_bytes()).unwrap(), v.to_le_bytes().to_vec());
            }
        }

        /// Deleting a key makes subsequent gets for that key fail, without
        /// disturbing any other live key.
        #[test]
        fn delete_removes_only_its_own_key(
            keys in prop::collection::hash_set(any::<u32>(), 2..100)
        ) {
            let engine = Engine::init(16).unwrap();
            let keys: Vec<u32> = keys.into_iter().collect();
            for &k in &keys {
                engine.put(&k.to_le_bytes(), &k.to_le_bytes()).unwrap();
            }
            let (deleted, survivors) = keys.split_at(1);
            for &k in deleted {
                engine.delete(&k.to_le_bytes()).unwrap();
                prop_assert!(engine.get(&k.to_le_bytes()).is_err());
            }
            for &k in survivors {
                prop_assert_eq!(engine.get(&k.to_le_bytes()).unwrap(), k.to_le_bytes().to_vec());
            }
        }

        /// Inserting the same set of keys in a different order produces the
        /// same final lookup results.
        #[test]
        fn insertion_order_does_not_affect_final_state(
            pairs in prop::collection::vec((any::<u16>(), any::<u16>()), 1..64)
        ) {
            let forward = Engine::init(16).unwrap();
            let backward = Engine::init(16).unwrap();
            for &(k, v) in &pairs {
                forward.put(&k.to_le_bytes(), &v.to_le_bytes()).unwrap();
            }
            for &(k, v) in pairs.iter().rev() {
                backward.put(&k.to_le_bytes(), &v.to_le_bytes()).unwrap();
            }
            let mut seen = std::collections::HashMap::new();
            for (k, v) in pairs {
                seen.insert(k, v);
            }
            for (k, v) in seen {
                prop_assert_eq!(forward.get(&k.to_le_bytes()).unwrap(), v.to_le_bytes().to_vec());
                prop_assert_eq!(backward.get(&k.to_le_bytes()).unwrap(), v.to_le_bytes().to_vec());
            }
        }

        /// item_count always equals the number of distinct live keys, and
        /// never exceeds capacity, under any interleaving of puts and
        /// deletes.
        #[test]
        fn counters_stay_consistent_under_churn(
            ops in prop::collection::vec((any::<u8>(), any::<bool>()), 1..300)
        ) {
            let engine = Engine::init(16).unwrap();
            let mut model: std::collections::HashSet<u8> = std::collections::HashSet::new();
            for (k, is_put) in ops {
                if is_put {
                    engine.put(&[k], &[k]).unwrap();
                    model.insert(k);
                } else {
                    let _ = engine.delete(&[k]);
                    model.remove(&k);
                }
            }
            let stats = engine.stats();
            prop_assert_eq!(stats.item_count, model.len());
            prop_assert!((stats.item_count as f64) <= (stats.capacity as f64));
        }
    }
}
