//! # Generic cache seams
//!
//! [`ClockProCache`](crate::policy::clock_pro::ClockProCache) exposes a
//! read-through API (`get`/`set` returning `Result`). The traits here give a
//! smaller, infallible view of the same engine for code that only needs
//! "put a value, look a value up", e.g. warmup helpers and benchmarks.
//!
//! ```text
//!   ReadOnlyCache<K, V>     contains · len · is_empty · capacity
//!          │
//!          ▼
//!   CoreCache<K, V>         insert · get · clear
//!          │
//!          ▼
//!   MutableCache<K, V>      remove · remove_batch
//!
//!   ConcurrentCache         marker: Send + Sync
//! ```
//!
//! ## How the engine maps onto the traits
//!
//! | Trait method             | CLOCK-Pro behavior                                   |
//! |--------------------------|------------------------------------------------------|
//! | `ReadOnlyCache::contains`| resident hot or cold page; ghosts report `false`     |
//! | `CoreCache::insert`      | same as `set`; a ghost key is re-admitted as hot     |
//! | `CoreCache::get`         | sets the reference bit, never calls the read callback|
//! | `MutableCache::remove`   | drops the value, leaves a test page behind           |
//!
//! `insert` and `remove` have no error channel, so they panic if the engine
//! reports a desynchronized ring. Use the inherent methods to observe
//! [`CacheError`](crate::error::CacheError) instead.

/// Side-effect free inspection.
///
/// # Example
///
/// ```
/// use clockpro::policy::clock_pro::ClockProCache;
/// use clockpro::traits::ReadOnlyCache;
///
/// fn fill_ratio<C: ReadOnlyCache<u64, u64>>(cache: &C) -> f64 {
///     cache.len() as f64 / cache.capacity() as f64
/// }
///
/// let mut cache = ClockProCache::new(4);
/// cache.set(1, 1).unwrap();
/// assert_eq!(fill_ratio(&cache), 0.25);
/// ```
pub trait ReadOnlyCache<K, V> {
    /// `true` if `key` currently holds a value. Reference bits are untouched.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;
}

/// Insert and lookup without a loader.
///
/// # Example
///
/// ```
/// use clockpro::policy::clock_pro::ClockProCache;
/// use clockpro::traits::{CoreCache, ReadOnlyCache};
///
/// fn preload<C: CoreCache<u64, String>>(cache: &mut C, rows: &[(u64, &str)]) {
///     for (id, name) in rows {
///         cache.insert(*id, name.to_string());
///     }
/// }
///
/// let mut cache = ClockProCache::new(16);
/// preload(&mut cache, &[(1, "alice"), (2, "bob")]);
/// assert_eq!(CoreCache::get(&mut cache, &2).map(String::as_str), Some("bob"));
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Stores `value` under `key` and returns the value it replaced.
    ///
    /// A full cache runs its replacement policy first; the displaced entry
    /// is not returned.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Borrows the value for `key`, marking it as recently used.
    ///
    /// Misses return `None` without loading anything. Use
    /// [`contains`](ReadOnlyCache::contains) to test membership without
    /// influencing replacement.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Drops every entry.
    fn clear(&mut self);
}

/// Explicit invalidation.
///
/// # Example
///
/// ```
/// use clockpro::policy::clock_pro::ClockProCache;
/// use clockpro::traits::{CoreCache, MutableCache, ReadOnlyCache};
///
/// let mut cache = ClockProCache::new(8);
/// for id in 0..4u64 {
///     cache.insert(id, id * 100);
/// }
///
/// assert_eq!(MutableCache::remove(&mut cache, &2), Some(200));
/// assert_eq!(cache.remove_batch(&[0, 2, 9]), vec![Some(0), None, None]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in turn; results line up with `keys`.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Marker for caches whose handles may be shared across threads.
///
/// [`ClockProCache`](crate::policy::clock_pro::ClockProCache) itself is not
/// one; either enable the `concurrency` feature for
/// `ConcurrentClockProCache` or put the engine behind a lock yourself:
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use clockpro::policy::clock_pro::ClockProCache;
///
/// let shared = Arc::new(Mutex::new(ClockProCache::<u64, String>::new(32)));
///
/// let writer = Arc::clone(&shared);
/// std::thread::spawn(move || {
///     writer.lock().unwrap().set(7, "seven".to_string()).unwrap();
/// })
/// .join()
/// .unwrap();
/// assert!(shared.lock().unwrap().is_cached(&7));
/// ```
pub trait ConcurrentCache: Send + Sync {}
