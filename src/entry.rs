//! Chain nodes and the links between them.

use core::fmt;
use core::hash::{Hash, Hasher};
use slotmap::DefaultKey;

/// Handle to a node in the table's arena.
///
/// A bucket holds the `Link` of its chain head and every node holds the
/// `Link` of its successor. Links are generational: a link to a removed
/// node never resolves to a node inserted later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Link(DefaultKey);

impl Link {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Link(k)
    }

    pub(crate) fn raw(self) -> DefaultKey {
        self.0
    }
}

/// A key/value node, also used as the element type of
/// [`ChainedHashMap::entry_set`](crate::ChainedHashMap::entry_set).
///
/// Equality and hashing look at the key and value only; the stored hash and
/// the successor link are bookkeeping.
#[derive(Clone)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<Link>,
}

impl<K, V> Entry<K, V> {
    /// Builds a node from its parts. `hash` is expected to be the spread
    /// hash of `key`.
    ///
    /// Links are only minted by the map, so callers outside this crate
    /// always pass `None` for `next`. Equality ignores both `hash` and
    /// `next`, so such an entry can be looked up in an
    /// [`EntrySet`](crate::EntrySet).
    pub fn new(key: K, value: V, hash: u64, next: Option<Link>) -> Self {
        Self {
            key,
            value,
            hash,
            next,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// The spread hash computed when the node was created.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Successor in the same bucket. Always `None` for snapshot entries.
    pub fn next(&self) -> Option<Link> {
        self.next
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub(crate) fn set_next(&mut self, next: Option<Link>) {
        self.next = next;
    }

    pub(crate) fn detached(&self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self::new(self.key.clone(), self.value.clone(), self.hash, None)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl<K: Eq, V: Eq> Eq for Entry<K, V> {}

impl<K: Hash, V: Hash> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}={:?}", self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value, 0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(t: &T) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    #[test]
    fn equality_ignores_hash_and_link() {
        let mut arena: SlotMap<DefaultKey, ()> = SlotMap::new();
        let link = Link::new(arena.insert(()));

        let a = Entry::new("k", 1, 7, None);
        let b = Entry::new("k", 1, 99, Some(link));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, Entry::new("k", 2, 7, None));
        assert_ne!(a, Entry::new("j", 1, 7, None));
    }

    #[test]
    fn accessors_return_parts() {
        let e = Entry::new("k".to_string(), 5, 42, None);
        assert_eq!(e.key(), "k");
        assert_eq!(*e.value(), 5);
        assert_eq!(e.hash(), 42);
        assert!(e.next().is_none());
        assert_eq!(e.into_parts(), ("k".to_string(), 5));
    }

    #[test]
    fn detached_copy_drops_link() {
        let mut arena: SlotMap<DefaultKey, ()> = SlotMap::new();
        let link = Link::new(arena.insert(()));
        let e = Entry::new(1, "one", 1, Some(link));
        let d = e.detached();
        assert_eq!(d, e);
        assert_eq!(d.hash(), 1);
        assert!(d.next().is_none());
    }

    #[test]
    fn debug_prints_key_and_value() {
        assert_eq!(format!("{:?}", Entry::new("a", 1, 0, None)), "\"a\"=1");
    }
}
