//! chained-hashmap: a single-threaded hash map with separately chained
//! buckets, explicit doubling growth, and immutable snapshot views.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash map whose bucket table, collision chains and growth
//!   policy are all visible and testable, rather than hidden behind an
//!   open-addressing table.
//! - Layers:
//!   - `spread`: folds the upper half of a 64-bit hash into the lower half
//!     and masks it down to a bucket index.
//!   - `entry` / `chain`: nodes live in a generational arena
//!     (`slotmap::SlotMap`) and each bucket is a singly linked chain of
//!     `Link` handles threaded through that arena.
//!   - `table`: `ChainedHashMap<K, V, S>` owns the bucket table and the
//!     arena and implements put/get/remove/grow.
//!   - `view`: `SnapshotSet<K>` and `EntrySet<K, V>` materialize keys or
//!     entries into owned, read-only sets.
//!
//! Growth
//! - The bucket table is not allocated until the first `put`, which
//!   allocates 16 buckets. `capacity()` reports 0 before that.
//! - Threshold is `floor(capacity * 0.75)`. A `put` that leaves more
//!   entries than the threshold doubles the table before returning.
//! - Growing builds a fresh head vector, relinks every node into it by the
//!   node's stored hash, and replaces the old vector in one assignment.
//!   `K: Hash` is never called after insertion.
//! - `remove` and `clear` never shrink the table.
//!
//! Chains
//! - New nodes are appended at the chain tail; growth preserves relative
//!   order within each resulting chain.
//! - Probing compares the stored hash first and only then calls `K: Eq`.
//!
//! Snapshots
//! - `key_set` and `entry_set` clone keys and values into a new
//!   `SnapshotSet` / `EntrySet`. Later map changes are not reflected; the
//!   sets' own mutators return `ViewError::UnsupportedOperation`.
//! - `EntrySet` is indexed by key, so values need only `Clone` to be
//!   snapshotted and `PartialEq` to be compared (float values work).
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` (no locks, no atomics).
//! - Reentrancy from `K: Hash`/`K: Eq` back into the same map is caught by
//!   a debug-only guard.
//! - There is no null key. `Option<K>` keys are ordinary keys.

mod chain;
pub mod entry;
mod error;
pub mod identity;
mod reentrancy;
pub mod spread;
pub mod table;
mod table_proptest;
mod view;

// Public surface
pub use entry::{Entry, Link};
pub use error::ViewError;
pub use identity::IdentityBuildHasher;
pub use table::{ChainedHashMap, Iter, DEFAULT_CAPACITY};
pub use view::{EntrySet, SnapshotSet};
