#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement directly.

use crate::chain;
use crate::identity::IdentityBuildHasher;
use crate::spread::bucket_index;
use crate::table::ChainedHashMap;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, pool length
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    Contains(String),
    Mutate(usize, i32),
    Snapshot,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Remove),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Snapshot),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Capacity is 0 or 16 * 2^r, and never below what `high_water` entries
// forced it to grow to.
fn expected_min_capacity(high_water: usize) -> usize {
    if high_water == 0 {
        return 0;
    }
    let mut cap = 16;
    while high_water > cap / 4 * 3 {
        cap *= 2;
    }
    cap
}

fn check_structure<S: BuildHasher>(
    sut: &ChainedHashMap<Key, i32, S>,
    high_water: usize,
) -> Result<(), TestCaseError> {
    let cap = sut.capacity();
    prop_assert_eq!(cap, expected_min_capacity(high_water));
    prop_assert!(sut.size() <= cap);
    let mut reachable = 0;
    for (i, head) in sut.table_heads().iter().enumerate() {
        for (_, e) in chain::links(sut.arena(), *head) {
            prop_assert_eq!(bucket_index(e.hash(), cap), i);
            reachable += 1;
        }
    }
    prop_assert_eq!(reachable, sut.size());
    Ok(())
}

fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut high_water = 0usize;

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = key_from(&pool, i);
                let before = sut.size();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                let grew = usize::from(prev.is_none());
                prop_assert_eq!(sut.size(), before + grew);
            }
            Op::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::Remove(i) => {
                let k = key_from(&pool, i);
                let cap = sut.capacity();
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert_eq!(sut.capacity(), cap, "remove must not shrink");
                prop_assert!(!sut.contains_key(&k));
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(v) = sut.get_mut(&k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(&k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            Op::Snapshot => {
                let keys = sut.key_set();
                let s_keys: BTreeSet<_> = keys.iter().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);

                let s_pairs: BTreeSet<_> = sut
                    .entry_set()
                    .into_iter()
                    .map(|e| e.into_parts())
                    .collect();
                let m_pairs: BTreeSet<_> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_pairs, m_pairs);
                prop_assert!(sut.key_set() == keys, "snapshots are repeatable");
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        high_water = high_water.max(sut.size());
        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut, high_water)?;
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `put` returns the previous value and only grows size for new keys.
// - `get`/`contains_key`/`remove` agree with the model.
// - Capacity is 0 or 16 * 2^r, tracks the size high-water mark, and never
//   shrinks.
// - Every reachable node sits in the bucket its stored hash masks to.
// - Snapshots match the model's keys and pairs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::with_hasher(RandomState::new()), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same invariants under worst-case collisions (every key in
// bucket 0) and under deterministic identity hashing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }

    #[test]
    fn prop_state_machine_identity_hasher((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::with_hasher(IdentityBuildHasher), pool, ops)?;
    }
}

// Property: sequential integer inserts follow the closed-form capacity
// 16 * 2^r, r = number of thresholds (12, 24, 48, ...) exceeded.
proptest! {
    #[test]
    fn prop_sequential_capacity(n in 1usize..600) {
        let mut m: ChainedHashMap<usize, usize, IdentityBuildHasher> =
            ChainedHashMap::with_hasher(IdentityBuildHasher);
        for k in 0..n {
            prop_assert_eq!(m.put(k, k), None);
        }
        let mut r = 0;
        let mut threshold = 12;
        while n > threshold {
            r += 1;
            threshold *= 2;
        }
        prop_assert_eq!(m.capacity(), 16 << r);
        prop_assert_eq!(m.size(), n);
        for k in 0..n {
            prop_assert_eq!(m.get(&k), Some(&k));
        }
    }
}
