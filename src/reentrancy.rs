//! Debug-only reentrancy detection for the table.
//!
//! `ChainedHashMap` calls into user code (`K: Hash`, `K: Eq`) in the middle
//! of `put` and `remove`. A key that reaches back into the same map from
//! there would observe a half-updated chain, so every public entry point
//! marks the table busy for its duration. In release builds the marker is
//! zero-sized and `enter` does nothing.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Busy marker embedded in the table.
#[derive(Debug)]
pub(crate) struct BusyFlag {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Raw pointer marker: the table is single-threaded, so `!Send + !Sync`.
    _single_thread: PhantomData<*mut ()>,
}

impl BusyFlag {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Marks the table busy until the returned guard is dropped.
    ///
    /// Panics in debug builds if the table is already busy.
    #[inline]
    pub(crate) fn enter(&self) -> Busy<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrancy detected: table accessed from inside key Hash/Eq"
            );
            return Busy { flag: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return Busy { _flag: PhantomData };
        }
    }
}

impl Default for BusyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy marker on drop.
pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    flag: &'a BusyFlag,
    #[cfg(not(debug_assertions))]
    _flag: PhantomData<&'a BusyFlag>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.flag.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::BusyFlag;

    #[test]
    fn sequential_entries_are_allowed() {
        let f = BusyFlag::new();
        drop(f.enter());
        drop(f.enter());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let f = BusyFlag::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = f.enter();
            let _inner = f.enter();
        }));
        assert!(res.is_err(), "expected nested entry to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_released_after_panic_unwinds() {
        let f = BusyFlag::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = f.enter();
            panic!("boom");
        }));
        drop(f.enter());
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let f = BusyFlag::new();
        let _outer = f.enter();
        let _inner = f.enter();
    }
}
