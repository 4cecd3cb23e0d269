//! Immutable snapshot sets returned by `key_set` and `entry_set`.

use crate::entry::Entry;
use crate::error::ViewError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::{HashSet, HashTable};

/// An owned, read-only set materialized from a map at one point in time.
///
/// Later changes to the map are not reflected. Structural mutators exist so
/// callers get a typed refusal instead of a silently diverging copy; every
/// one of them returns [`ViewError::UnsupportedOperation`].
#[derive(Clone)]
pub struct SnapshotSet<T> {
    items: HashSet<T>,
}

impl<T: Eq + Hash> SnapshotSet<T> {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            items: HashSet::with_capacity(n),
        }
    }

    // Only the map populates a snapshot.
    pub(crate) fn push(&mut self, item: T) {
        self.items.insert(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.contains(q)
    }

    /// Iterates in unspecified order.
    pub fn iter(&self) -> hashbrown::hash_set::Iter<'_, T> {
        self.items.iter()
    }

    /// Always fails: snapshots cannot grow.
    pub fn insert(&mut self, _item: T) -> Result<bool, ViewError> {
        Err(ViewError::UnsupportedOperation { op: "insert" })
    }

    /// Always fails: snapshots cannot shrink.
    pub fn remove<Q>(&mut self, _q: &Q) -> Result<bool, ViewError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Err(ViewError::UnsupportedOperation { op: "remove" })
    }

    /// Always fails: snapshots cannot shrink.
    pub fn clear(&mut self) -> Result<(), ViewError> {
        Err(ViewError::UnsupportedOperation { op: "clear" })
    }
}

impl<T: Eq + Hash> PartialEq for SnapshotSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash> Eq for SnapshotSet<T> {}

impl<T: fmt::Debug> fmt::Debug for SnapshotSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a SnapshotSet<T> {
    type Item = &'a T;
    type IntoIter = hashbrown::hash_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for SnapshotSet<T> {
    type Item = T;
    type IntoIter = hashbrown::hash_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Read-only snapshot of a map's entries.
///
/// Entries are indexed by key alone, so values only need `PartialEq` for
/// membership and equality checks. Like [`SnapshotSet`], every mutator
/// returns [`ViewError::UnsupportedOperation`].
#[derive(Clone)]
pub struct EntrySet<K, V> {
    hasher: DefaultHashBuilder,
    entries: HashTable<Entry<K, V>>,
}

fn hash_key<Q: ?Sized + Hash>(hasher: &DefaultHashBuilder, q: &Q) -> u64 {
    BuildHasher::hash_one(hasher, q)
}

impl<K: Eq + Hash, V> EntrySet<K, V> {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            hasher: DefaultHashBuilder::default(),
            entries: HashTable::with_capacity(n),
        }
    }

    // Keys coming from one map are already distinct.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        let hasher = &self.hasher;
        let hash = hash_key(hasher, entry.key());
        self.entries.insert_unique(hash, entry, |e| hash_key(hasher, e.key()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot entry for `q`, if the key was present.
    pub fn get<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = hash_key(&self.hasher, q);
        self.entries.find(hash, |e| e.key().borrow() == q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// True if `entry`'s key is present with an equal value.
    pub fn contains(&self, entry: &Entry<K, V>) -> bool
    where
        V: PartialEq,
    {
        self.get(entry.key()).is_some_and(|e| e.value() == entry.value())
    }

    /// Iterates in unspecified order.
    pub fn iter(&self) -> hashbrown::hash_table::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    /// Always fails: snapshots cannot grow.
    pub fn insert(&mut self, _entry: Entry<K, V>) -> Result<bool, ViewError> {
        Err(ViewError::UnsupportedOperation { op: "insert" })
    }

    /// Always fails: snapshots cannot shrink.
    pub fn remove(&mut self, _entry: &Entry<K, V>) -> Result<bool, ViewError> {
        Err(ViewError::UnsupportedOperation { op: "remove" })
    }

    /// Always fails: snapshots cannot shrink.
    pub fn clear(&mut self) -> Result<(), ViewError> {
        Err(ViewError::UnsupportedOperation { op: "clear" })
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for EntrySet<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|e| other.contains(e))
    }
}

impl<K: Eq + Hash, V: Eq> Eq for EntrySet<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntrySet<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a EntrySet<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = hashbrown::hash_table::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> IntoIterator for EntrySet<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = hashbrown::hash_table::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
