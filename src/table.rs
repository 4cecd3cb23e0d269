//! ChainedHashMap: bucket table, chaining and growth.

use crate::chain::{self, Arena};
use crate::entry::{Entry, Link};
use crate::reentrancy::BusyFlag;
use crate::spread::{bucket_index, spread};
use crate::view::{EntrySet, SnapshotSet};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use tracing::{debug, trace};

/// Bucket count allocated by the first insertion.
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor 0.75 as an exact ratio, so thresholds are
/// `floor(capacity * 3 / 4)` without float rounding.
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

fn threshold_for(capacity: usize) -> usize {
    capacity / LOAD_FACTOR_DEN * LOAD_FACTOR_NUM
}

/// Chain heads, one per bucket. Empty until the first insertion, then
/// always a power of two long.
struct BucketTable {
    heads: Vec<Option<Link>>,
    threshold: usize,
}

impl BucketTable {
    const fn new() -> Self {
        Self {
            heads: Vec::new(),
            threshold: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.heads.len()
    }

    fn is_allocated(&self) -> bool {
        !self.heads.is_empty()
    }

    fn index(&self, hash: u64) -> usize {
        bucket_index(hash, self.heads.len())
    }

    fn allocate(&mut self) {
        self.heads = vec![None; DEFAULT_CAPACITY];
        self.threshold = threshold_for(DEFAULT_CAPACITY);
        debug!(
            capacity = DEFAULT_CAPACITY,
            threshold = self.threshold,
            "allocated bucket table"
        );
    }

    /// Doubles the table and relinks every node by its stored hash.
    ///
    /// The new heads are built beside the old ones and swapped in at the
    /// end. Nodes keep their relative order within each chain.
    fn grow<K, V>(&mut self, nodes: &mut Arena<K, V>) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let mut heads: Vec<Option<Link>> = vec![None; new_capacity];
        let mut tails: Vec<Option<Link>> = vec![None; new_capacity];

        for head in core::mem::take(&mut self.heads) {
            let mut cur = head;
            while let Some(link) = cur {
                let Some(node) = nodes.get_mut(link.raw()) else {
                    break;
                };
                cur = node.next();
                node.set_next(None);
                let idx = bucket_index(node.hash(), new_capacity);

                match tails[idx] {
                    None => heads[idx] = Some(link),
                    Some(tail) => {
                        if let Some(t) = nodes.get_mut(tail.raw()) {
                            t.set_next(Some(link));
                        }
                    }
                }
                tails[idx] = Some(link);
            }
        }

        self.heads = heads;
        self.threshold = threshold_for(new_capacity);
        debug!(
            old_capacity,
            new_capacity,
            size = nodes.len(),
            threshold = self.threshold,
            "resized bucket table"
        );
    }
}

/// A hash map with separately chained buckets.
///
/// The bucket table is allocated lazily at [`DEFAULT_CAPACITY`] and doubles
/// whenever the entry count exceeds three quarters of the bucket count.
/// Nodes live in an arena and are linked per bucket through [`Link`]s;
/// growing the table relinks nodes without moving or rehashing keys.
///
/// The map is single-threaded (`!Send`, `!Sync`).
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    table: BucketTable,
    nodes: Arena<K, V>, // storage using generational keys
    busy: BusyFlag,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: BucketTable::new(),
            nodes: Arena::new(),
            busy: BusyFlag::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        spread(self.hasher.hash_one(q))
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of buckets; 0 until the first insertion.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Entry count above which the next insertion grows the table.
    pub fn threshold(&self) -> usize {
        self.table.threshold
    }

    /// Inserts or replaces the value for `key`, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.busy.enter();
        if !self.table.is_allocated() {
            self.table.allocate();
        }
        let hash = self.make_hash(&key);
        let idx = self.table.index(hash);

        if let Some(link) = chain::find(&self.nodes, self.table.heads[idx], hash, &key) {
            let slot = &mut self.nodes[link.raw()];
            return Some(core::mem::replace(slot.value_mut(), value));
        }

        let link = Link::new(self.nodes.insert(Entry::new(key, value, hash, None)));
        chain::append(&mut self.nodes, &mut self.table.heads[idx], link);

        if self.nodes.len() > self.table.threshold {
            self.table.grow(&mut self.nodes);
        }
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let link = self.locate(q)?;
        self.nodes.get(link.raw()).map(Entry::value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = {
            let _g = self.busy.enter();
            self.locate(q)?
        };
        self.nodes.get_mut(link.raw()).map(Entry::value_mut)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        self.locate(q).is_some()
    }

    /// Removes `q`'s entry and returns its value. Never shrinks the table.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = {
            let _g = self.busy.enter();
            if !self.table.is_allocated() {
                return None;
            }
            let hash = self.make_hash(q);
            let idx = self.table.index(hash);
            let link = chain::unlink(&mut self.nodes, &mut self.table.heads[idx], hash, q)?;
            self.nodes.remove(link.raw())?
        };
        // Chains are consistent again; K/V drop glue may reenter.
        Some(removed.into_parts())
    }

    /// Drops every entry. The bucket table keeps its capacity.
    pub fn clear(&mut self) {
        let nodes = {
            let _g = self.busy.enter();
            self.table.heads.iter_mut().for_each(|h| *h = None);
            core::mem::take(&mut self.nodes)
        };
        trace!(
            dropped = nodes.len(),
            capacity = self.table.capacity(),
            "cleared table"
        );
        drop(nodes);
    }

    fn locate<Q>(&self, q: &Q) -> Option<Link>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if !self.table.is_allocated() {
            return None;
        }
        let hash = self.make_hash(q);
        chain::find(&self.nodes, self.table.heads[self.table.index(hash)], hash, q)
    }

    /// Snapshot of the current keys.
    pub fn key_set(&self) -> SnapshotSet<K>
    where
        K: Clone,
    {
        let _g = self.busy.enter();
        let mut set = SnapshotSet::with_capacity(self.size());
        for (k, _) in self.iter() {
            set.push(k.clone());
        }
        set
    }

    /// Snapshot of the current key/value pairs.
    pub fn entry_set(&self) -> EntrySet<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let _g = self.busy.enter();
        let mut set = EntrySet::with_capacity(self.size());
        for head in &self.table.heads {
            for (_, e) in chain::links(&self.nodes, *head) {
                set.push(e.detached());
            }
        }
        set
    }

    /// Snapshot of the current values, in bucket order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Iterates bucket by bucket, each chain head first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            heads: self.table.heads.iter(),
            chain: None,
            nodes: &self.nodes,
            remaining: self.nodes.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn table_heads(&self) -> &[Option<Link>] {
        &self.table.heads
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> &Arena<K, V> {
        &self.nodes
    }
}

/// Borrowing iterator over a [`ChainedHashMap`].
pub struct Iter<'a, K, V> {
    heads: core::slice::Iter<'a, Option<Link>>,
    chain: Option<chain::Links<'a, K, V>>,
    nodes: &'a Arena<K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, e)) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((e.key(), e.value()));
            }
            let head = *self.heads.next()?;
            self.chain = Some(chain::links(self.nodes, head));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
