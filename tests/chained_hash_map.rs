// ChainedHashMap integration suite.
//
// Each test documents the behavior being verified. The core invariants
// exercised:
// - Last write wins: `get` returns the most recently `put` value.
// - Size accounting: new keys grow size by one, replacements do not.
// - Absence: missing keys (even on an untouched map) read as `None`.
// - Growth: capacity is 0, then 16, then doubles exactly when size
//   exceeds floor(capacity * 0.75).
// - Chaining: keys sharing a bucket stay independently addressable.
use chained_hashmap::{ChainedHashMap, Entry, IdentityBuildHasher, DEFAULT_CAPACITY};
use std::collections::HashSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("chained_hashmap=debug")
        .with_test_writer()
        .try_init();
}

fn identity_map<V>() -> ChainedHashMap<i32, V, IdentityBuildHasher> {
    ChainedHashMap::with_hasher(IdentityBuildHasher)
}

// Test: last write wins, replacement returns prior value.
#[test]
fn put_get_replace() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    assert_eq!(m.put("a".to_string(), 1), None);
    assert_eq!(m.put("b".to_string(), 2), None);
    assert_eq!(m.size(), 2);

    assert_eq!(m.put("a".to_string(), 10), Some(1));
    assert_eq!(m.size(), 2, "replacement must not change size");
    assert_eq!(m.get("a"), Some(&10));
    assert_eq!(m.get("b"), Some(&2));
}

// Test: removal returns the value, shrinks size, and the key disappears
// from both snapshot views.
#[test]
fn remove_existing_key() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    m.put("a".to_string(), 1);
    m.put("b".to_string(), 2);

    assert_eq!(m.remove("a"), Some(1));
    assert_eq!(m.size(), 1);
    assert_eq!(m.get("a"), None);
    assert!(!m.key_set().contains("a"));
    assert!(!m.entry_set().contains(&Entry::new("a".to_string(), 1, 0, None)));
    assert!(m.key_set().contains("b"));
}

// Test: absent lookups and removals are plain `None`, with no side effects
// on an untouched map or on a populated one.
#[test]
fn missing_keys_are_absent() {
    let mut m: ChainedHashMap<i32, i32> = ChainedHashMap::new();
    assert_eq!(m.get(&1), None);
    assert_eq!(m.remove(&1), None);
    assert_eq!(m.size(), 0);
    assert_eq!(m.capacity(), 0);
    assert!(m.key_set().is_empty());
    assert!(m.entry_set().is_empty());

    m.put(1, 1);
    assert_eq!(m.get(&2), None);
    assert_eq!(m.remove(&2), None);
    assert_eq!(m.size(), 1);
}

// Test: capacity progression 0 -> 16 -> 32 -> 64 at thresholds 12, 24, 48.
#[test]
fn capacity_doubles_past_threshold() {
    init_tracing();
    let mut m = identity_map();
    assert_eq!(m.capacity(), 0);

    m.put(0, 0);
    assert_eq!(m.capacity(), DEFAULT_CAPACITY);

    let mut expected = 16;
    for k in 1..200 {
        m.put(k, k);
        let size = m.size();
        if size > expected / 4 * 3 {
            expected *= 2;
        }
        assert_eq!(m.capacity(), expected, "after {} entries", size);
    }
    assert_eq!(m.capacity(), 512);
}

// Test: replacing values never triggers growth.
#[test]
fn replacements_do_not_grow() {
    let mut m = identity_map();
    for k in 0..12 {
        m.put(k, 0);
    }
    for round in 1..5 {
        for k in 0..12 {
            assert_eq!(m.put(k, round), Some(round - 1));
        }
    }
    assert_eq!(m.size(), 12);
    assert_eq!(m.capacity(), 16);
}

// Test: regression for chained collisions. With identity hashing, keys 1,
// 33 and 65 all land in bucket 1 of a 32-bucket table.
#[test]
fn colliding_keys_at_capacity_32() {
    let mut m = identity_map();
    for k in 100..113 {
        m.put(k, "filler");
    }
    for k in 100..113 {
        m.remove(&k);
    }
    assert_eq!(m.capacity(), 32);

    m.put(1, "one");
    m.put(33, "thirty-three");
    m.put(65, "sixty-five");
    assert_eq!(m.size(), 3);
    assert_eq!(m.get(&1), Some(&"one"));
    assert_eq!(m.get(&33), Some(&"thirty-three"));
    assert_eq!(m.get(&65), Some(&"sixty-five"));

    assert_eq!(m.put(33, "updated"), Some("thirty-three"));
    assert_eq!(m.remove(&1), Some("one"));
    assert_eq!(m.get(&33), Some(&"updated"));
    assert_eq!(m.get(&65), Some(&"sixty-five"));
    assert_eq!(m.size(), 2);
}

// Test: reads are idempotent.
#[test]
fn repeated_reads_are_identical() {
    let m: ChainedHashMap<String, usize> = (0..30).map(|i| (format!("k{i}"), i)).collect();
    assert_eq!(m.get("k7"), m.get("k7"));
    assert_eq!(m.key_set(), m.key_set());
    assert_eq!(m.entry_set(), m.entry_set());
}

// Test: end-to-end with 100 sequential pairs. The thresholds 12, 24, 48 and
// 96 are all exceeded, so capacity is 16 * 2^4. Capacity 128 has threshold
// 96 and 100 entries exceed it, so the table ends at 256, not 128.
#[test]
fn hundred_entries_end_to_end() {
    init_tracing();
    let mut m: ChainedHashMap<String, String> = ChainedHashMap::new();
    for i in 0..100 {
        assert_eq!(m.put(format!("key{i}"), format!("value{i}")), None);
    }
    assert_eq!(m.size(), 100);
    assert_eq!(m.capacity(), 256);

    for i in 0..100 {
        assert_eq!(m.get(format!("key{i}").as_str()), Some(&format!("value{i}")));
    }

    let entries = m.entry_set();
    assert_eq!(entries.len(), 100);
    let got: HashSet<(String, String)> = entries.into_iter().map(Entry::into_parts).collect();
    let want: HashSet<(String, String)> = (0..100)
        .map(|i| (format!("key{i}"), format!("value{i}")))
        .collect();
    assert_eq!(got, want);
}

// Test: borrowed lookups, `Extend`, `values`, `iter` and `clear`.
#[test]
fn map_surface_helpers() {
    let mut m: ChainedHashMap<String, u32> = ChainedHashMap::new();
    m.extend([("x".to_string(), 1), ("y".to_string(), 2)]);
    assert!(m.contains_key("x"));
    assert_eq!(m.len(), 2);

    *m.get_mut("y").unwrap() += 40;
    let mut values = m.values();
    values.sort_unstable();
    assert_eq!(values, vec![1, 42]);

    let pairs: HashSet<(&String, &u32)> = m.iter().collect();
    assert_eq!(pairs.len(), 2);
    assert_eq!(m.remove_entry("x"), Some(("x".to_string(), 1)));

    let cap = m.capacity();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.get("y"), None);
}

// Test: `Option` keys behave as ordinary keys; `None` is a valid key.
#[test]
fn option_keys_are_ordinary() {
    let mut m: ChainedHashMap<Option<i32>, &str> = ChainedHashMap::new();
    assert_eq!(m.put(None, "none"), None);
    assert_eq!(m.put(Some(0), "zero"), None);
    assert_eq!(m.get(&None::<i32>), Some(&"none"));
    assert_eq!(m.put(None, "again"), Some("none"));
    assert_eq!(m.size(), 2);
}
