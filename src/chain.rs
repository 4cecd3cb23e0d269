//! Singly linked chains threaded through the node arena.
//!
//! A chain is identified by its head slot (`Option<Link>` in the bucket
//! table). These helpers never call `K: Hash`; they compare stored hashes
//! first and only then fall back to `K: Eq`.

use crate::entry::{Entry, Link};
use core::borrow::Borrow;
use slotmap::{DefaultKey, SlotMap};

pub(crate) type Arena<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Walks the links of one chain, head first.
pub(crate) struct Links<'a, K, V> {
    arena: &'a Arena<K, V>,
    cur: Option<Link>,
}

impl<'a, K, V> Iterator for Links<'a, K, V> {
    type Item = (Link, &'a Entry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cur?;
        let entry = self.arena.get(link.raw())?;
        self.cur = entry.next();
        Some((link, entry))
    }
}

pub(crate) fn links<K, V>(arena: &Arena<K, V>, head: Option<Link>) -> Links<'_, K, V> {
    Links { arena, cur: head }
}

/// First node in the chain whose key equals `q`.
pub(crate) fn find<K, V, Q>(
    arena: &Arena<K, V>,
    head: Option<Link>,
    hash: u64,
    q: &Q,
) -> Option<Link>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    links(arena, head)
        .find(|(_, e)| e.hash() == hash && e.key().borrow() == q)
        .map(|(link, _)| link)
}

/// Links `node` after the current tail of the chain.
pub(crate) fn append<K, V>(arena: &mut Arena<K, V>, head: &mut Option<Link>, node: Link) {
    let tail = links(arena, *head).last().map(|(link, _)| link);
    match tail {
        None => *head = Some(node),
        Some(tail) => {
            if let Some(e) = arena.get_mut(tail.raw()) {
                e.set_next(Some(node));
            }
        }
    }
}

/// Unlinks the node whose key equals `q` and returns it, leaving it in the
/// arena for the caller to reclaim.
pub(crate) fn unlink<K, V, Q>(
    arena: &mut Arena<K, V>,
    head: &mut Option<Link>,
    hash: u64,
    q: &Q,
) -> Option<Link>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let mut prev: Option<Link> = None;
    let mut found = None;
    for (link, e) in links(arena, *head) {
        if e.hash() == hash && e.key().borrow() == q {
            found = Some((link, e.next()));
            break;
        }
        prev = Some(link);
    }
    let (link, next) = found?;

    match prev {
        None => *head = next,
        Some(p) => {
            if let Some(e) = arena.get_mut(p.raw()) {
                e.set_next(next);
            }
        }
    }
    if let Some(e) = arena.get_mut(link.raw()) {
        e.set_next(None);
    }
    Some(link)
}
