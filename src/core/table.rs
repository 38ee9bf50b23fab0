//! # Registration table: identity key → weak handler.
//!
//! ## Rules
//! - Keys are the address of the handler's `Arc` allocation. The entry's own `Weak`
//!   keeps that allocation from being freed, so a key cannot be reused by another
//!   handler while the entry exists.
//! - Values are `Weak<H>` only; the table never keeps a handler alive.
//! - Every insert is stamped with a fresh generation so a [`Subscription`](crate::Subscription)
//!   removes exactly the registration it created.
//! - No shard guard escapes this module: callers never hold a lock while user code runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

/// Stable identity of a registered handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct HandlerKey(usize);

impl HandlerKey {
    pub(crate) fn of_arc<H: ?Sized>(handler: &Arc<H>) -> Self {
        Self(Arc::as_ptr(handler).cast::<()>() as usize)
    }

    pub(crate) fn of_weak<H: ?Sized>(handler: &Weak<H>) -> Self {
        Self(handler.as_ptr().cast::<()>() as usize)
    }
}

struct Entry<H: ?Sized> {
    handler: Weak<H>,
    generation: u64,
}

/// Snapshot taken at the start of an invocation pass.
pub(crate) struct Snapshot<H: ?Sized> {
    pub(crate) live: Vec<Arc<H>>,
    pub(crate) dead: usize,
}

pub(crate) struct Table<H: ?Sized> {
    entries: DashMap<HandlerKey, Entry<H>>,
    generation: AtomicU64,
}

impl<H: ?Sized> Table<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Stores (or overwrites) the handler at its key; returns the new generation.
    pub(crate) fn insert(&self, handler: Weak<H>) -> (HandlerKey, u64) {
        let key = HandlerKey::of_weak(&handler);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.insert(
            key,
            Entry {
                handler,
                generation,
            },
        );
        (key, generation)
    }

    pub(crate) fn remove(&self, key: HandlerKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    /// Removes the entry only if it still carries `generation`.
    pub(crate) fn remove_generation(&self, key: HandlerKey, generation: u64) -> bool {
        let removed = self
            .entries
            .remove_if(&key, |_, entry| entry.generation == generation);
        removed.is_some()
    }

    pub(crate) fn holds_generation(&self, key: HandlerKey, generation: u64) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation)
    }

    /// Upgrades every entry; live handlers are returned, dead ones counted.
    pub(crate) fn snapshot(&self) -> Snapshot<H> {
        let mut live = Vec::with_capacity(self.entries.len());
        let mut dead = 0;
        for entry in self.entries.iter() {
            match entry.value().handler.upgrade() {
                Some(handler) => live.push(handler),
                None => dead += 1,
            }
        }
        Snapshot { live, dead }
    }

    /// Drops every entry whose handler was reclaimed; returns how many were dropped.
    pub(crate) fn purge_dead(&self) -> usize {
        let mut purged = 0;
        self.entries.retain(|_, entry| {
            let alive = entry.handler.strong_count() > 0;
            if !alive {
                purged += 1;
            }
            alive
        });
        purged
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Type-erased removal hook used by [`Subscription`](crate::Subscription).
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, key: HandlerKey, generation: u64) -> bool;
    fn is_attached(&self, key: HandlerKey, generation: u64) -> bool;
}

impl<H: ?Sized + Send + Sync + 'static> Detach for Table<H> {
    fn detach(&self, key: HandlerKey, generation: u64) -> bool {
        self.remove_generation(key, generation)
    }

    fn is_attached(&self, key: HandlerKey, generation: u64) -> bool {
        self.holds_generation(key, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_allocation_same_key() {
        let a: Arc<dyn Fn() + Send + Sync> = Arc::new(|| {});
        let b = Arc::clone(&a);
        assert_eq!(HandlerKey::of_arc(&a), HandlerKey::of_arc(&b));
        assert_eq!(HandlerKey::of_arc(&a), HandlerKey::of_weak(&Arc::downgrade(&a)));
    }

    #[test]
    fn test_distinct_allocations_distinct_keys() {
        let a = Arc::new(1u32);
        let b = Arc::new(1u32);
        assert_ne!(HandlerKey::of_arc(&a), HandlerKey::of_arc(&b));
    }

    #[test]
    fn test_overwrite_bumps_generation() {
        let table = Table::<u32>::new();
        let h = Arc::new(7u32);
        let (key, first) = table.insert(Arc::downgrade(&h));
        let (_, second) = table.insert(Arc::downgrade(&h));

        assert_eq!(table.len(), 1);
        assert!(second > first);
        assert!(!table.remove_generation(key, first));
        assert!(table.holds_generation(key, second));
        assert!(table.remove_generation(key, second));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_snapshot_and_purge() {
        let table = Table::<u32>::new();
        let kept = Arc::new(1u32);
        let dropped = Arc::new(2u32);
        table.insert(Arc::downgrade(&kept));
        table.insert(Arc::downgrade(&dropped));
        drop(dropped);

        let snap = table.snapshot();
        assert_eq!(snap.live.len(), 1);
        assert_eq!(*snap.live[0], 1);
        assert_eq!(snap.dead, 1);

        assert_eq!(table.purge_dead(), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.purge_dead(), 0);
    }
}
