//! Key-to-value store for every page the ring tracks.
//!
//! Each tracked key maps to its ring handle plus, for hot and cold pages, the
//! resident entry. Test (ghost) pages keep the handle but no entry, so one
//! lookup answers both "is it cached?" and "where is its ring record?".
//!
//! ```text
//!   map: FxHashMap<K, Tracked<V>>
//!   ┌───────┬──────────────────────────────────────────────┐
//!   │ key A │ node: id_a, entry: Some({ value, ref: true })│  resident
//!   │ key B │ node: id_b, entry: None                      │  ghost
//!   └───────┴──────────────────────────────────────────────┘
//! ```
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::SlotId;

/// A resident value and its CLOCK reference bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentEntry<V> {
    pub value: V,
    pub referenced: bool,
}

impl<V> ResidentEntry<V> {
    /// Creates an unreferenced entry.
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            value,
            referenced: false,
        }
    }
}

#[derive(Debug)]
struct Tracked<V> {
    node: SlotId,
    entry: Option<ResidentEntry<V>>,
}

/// Mapping from key to ring handle and optional resident entry.
#[derive(Debug)]
pub struct ResidentStore<K, V> {
    map: FxHashMap<K, Tracked<V>>,
    resident: usize,
}

impl<K, V> ResidentStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            resident: 0,
        }
    }

    /// Returns the resident entry for `key`, if it holds a value.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&ResidentEntry<V>> {
        self.map.get(key)?.entry.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut ResidentEntry<V>> {
        self.map.get_mut(key)?.entry.as_mut()
    }

    /// Returns the ring handle for any tracked key, resident or ghost.
    #[inline]
    pub fn node(&self, key: &K) -> Option<SlotId> {
        self.map.get(key).map(|tracked| tracked.node)
    }

    /// Stores a resident entry for `key` at ring node `node`.
    ///
    /// Returns the previous entry, if `key` was resident.
    pub fn set(&mut self, key: K, node: SlotId, entry: ResidentEntry<V>) -> Option<ResidentEntry<V>> {
        let previous = self
            .map
            .insert(
                key,
                Tracked {
                    node,
                    entry: Some(entry),
                },
            )
            .and_then(|tracked| tracked.entry);
        if previous.is_none() {
            self.resident += 1;
        }
        previous
    }

    /// Turns `key` into a ghost, returning the dropped value.
    pub fn set_absent(&mut self, key: &K) -> Option<V> {
        let entry = self.map.get_mut(key)?.entry.take()?;
        self.resident -= 1;
        Some(entry.value)
    }

    /// Forgets `key` entirely and returns its ring handle.
    pub fn remove(&mut self, key: &K) -> Option<SlotId> {
        let tracked = self.map.remove(key)?;
        if tracked.entry.is_some() {
            self.resident -= 1;
        }
        Some(tracked.node)
    }

    /// Returns `true` if `key` holds a value (ghosts excluded).
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if `key` is tracked as a ghost.
    #[inline]
    pub fn is_ghost(&self, key: &K) -> bool {
        self.map
            .get(key)
            .is_some_and(|tracked| tracked.entry.is_none())
    }

    /// Number of keys holding a value.
    #[inline]
    pub fn resident_len(&self) -> usize {
        self.resident
    }

    /// Number of tracked keys, ghosts included.
    #[inline]
    pub fn tracked_len(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.resident = 0;
    }

    /// Iterates `(key, node, entry)` over every tracked key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, SlotId, Option<&ResidentEntry<V>>)> {
        self.map
            .iter()
            .map(|(key, tracked)| (key, tracked.node, tracked.entry.as_ref()))
    }
}

impl<K, V> Default for ResidentStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
