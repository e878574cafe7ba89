//! Model-checked tests for the SnapshotStore publish protocol.
//!
//! With the `loom` feature the store's locks are `loom::sync::Mutex`, so
//! `loom::model` explores every interleaving of the threads below.
//!
//! # Running these tests
//!
//! ```bash
//! cargo test --test snapshot_store_loom_tests --features loom --release
//! ```

#![cfg(feature = "loom")]

use cowtrie::store::SnapshotStore;
use loom::sync::Arc;
use loom::thread;

/// A reader racing one writer sees the version before or after the write.
#[test]
fn test_reader_sees_pre_or_post_write_version() {
    loom::model(|| {
        let store = Arc::new(SnapshotStore::new());
        store.put("a", 0_u32);
        store.put("b", 0_u32);

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.remove("a");
                store.put("b", 1_u32);
            })
        };

        let snapshot = store.snapshot();
        let a = snapshot.get::<u32>("a").copied();
        let b = snapshot.get::<u32>("b").copied();
        assert!(
            matches!(
                (a, b),
                (Some(0), Some(0)) | (None, Some(0)) | (None, Some(1))
            ),
            "unexpected snapshot: a={a:?} b={b:?}"
        );

        writer.join().unwrap();
        assert_eq!(store.version(), 4);
    });
}

/// Two writers are serialized; neither update is lost.
#[test]
fn test_concurrent_writers_are_serialized() {
    loom::model(|| {
        let store = Arc::new(SnapshotStore::new());

        let handles: Vec<_> = ["left", "right"]
            .into_iter()
            .map(|key| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.put(key, key.len()))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get::<usize>("left").as_deref(), Some(&4));
        assert_eq!(store.get::<usize>("right").as_deref(), Some(&5));
        assert_eq!(store.version(), 2);
    });
}

/// A guard taken before a concurrent remove keeps its value.
#[test]
fn test_guard_survives_concurrent_remove() {
    loom::model(|| {
        let store = Arc::new(SnapshotStore::new());
        store.put("k", 7_u64);

        let guard = store.get::<u64>("k").unwrap();

        let remover = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.remove("k"))
        };

        assert_eq!(*guard, 7);
        remover.join().unwrap();
        assert_eq!(*guard, 7);
        assert!(store.get::<u64>("k").is_none());
    });
}
