//! Concurrent map used by the registry.
//!
//! A thin layer over [`DashMap`] that exposes the small contract the registry
//! relies on: put/get/delete/size plus an early-exit `range` that never holds
//! a shard lock while the caller's callback runs.

use dashmap::{mapref::entry::Entry, DashMap};
use std::{borrow::Borrow, fmt, hash::Hash};

/// Key/value map safe for any mix of concurrent readers and writers.
///
/// Values are cloned out on read, so `V` is normally an `Arc` or a small
/// copyable value.
pub struct SyncMap<K, V> {
    inner: DashMap<K, V>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Insert or overwrite `key`, returning the previous value if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.remove(key).map(|(_, value)| value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Insert `value` only if `key` is vacant. Returns whether it was inserted.
    pub fn put_if_absent(&self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Remove `key` only if `f` approves its current value.
    pub fn delete_if<Q, F>(&self, key: &Q, f: F) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> bool,
    {
        self.inner
            .remove_if(key, |_, value| f(value))
            .map(|(_, value)| value)
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Owned copy of every entry at the time of the call.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Visit entries in unspecified order until `f` returns `false`.
    ///
    /// The callback runs over a snapshot, so it may read from this map.
    /// Writing to the map from inside `f` is not supported: the write will
    /// land, but whether this `range` call observes it is undefined.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.snapshot() {
            if !f(&key, &value) {
                break;
            }
        }
    }
}

impl<K, V> Default for SyncMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SyncMap<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncMap")
            .field("len", &self.inner.len())
            .finish()
    }
}
