use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ds::clock_ring::PageType;
use crate::error::{CacheError, ConfigError, InvariantError, LoadError};
use crate::stats::CacheStats;
use crate::traits::ConcurrentCache;

use super::ClockProCache;

/// Thread-safe CLOCK-Pro cache wrapper using `Mutex`.
///
/// Every CLOCK-Pro read sets a reference bit and may load through the read
/// callback, so there is no shared-read path: each call takes the lock for
/// its whole duration, callbacks included. Clones share the same cache.
///
/// # Example
///
/// ```
/// use clockpro::policy::clock_pro::ConcurrentClockProCache;
///
/// let cache = ConcurrentClockProCache::new(100);
/// cache.set_read_fn(|key: &u64| Ok(key * 2));
///
/// let handle = {
///     let cache = cache.clone();
///     std::thread::spawn(move || cache.get(&21).unwrap())
/// };
/// assert_eq!(handle.join().unwrap(), 42);
/// assert!(cache.is_cached(&21));
/// ```
#[derive(Debug)]
pub struct ConcurrentClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    inner: Arc<Mutex<ClockProCache<K, V>>>,
}

impl<K, V> Clone for ConcurrentClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a new concurrent cache; zero capacity never retains entries.
    pub fn new(capacity: usize) -> Self {
        Self::from(ClockProCache::new(capacity))
    }

    /// Creates a new concurrent cache, rejecting zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        ClockProCache::try_new(capacity).map(Self::from)
    }

    pub fn set_read_fn<F>(&self, read: F)
    where
        F: FnMut(&K) -> Result<V, LoadError> + Send + 'static,
    {
        self.inner.lock().set_read_fn(read);
    }

    pub fn set_write_fn<F>(&self, write: F)
    where
        F: FnMut(&K, V) + Send + 'static,
    {
        self.inner.lock().set_write_fn(write);
    }

    /// Returns a clone of the value, loading it on a miss.
    pub fn get(&self, key: &K) -> Result<V, CacheError>
    where
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    pub fn set(&self, key: K, value: V) -> Result<Option<V>, CacheError> {
        self.inner.lock().set(key, value)
    }

    pub fn remove(&self, key: &K) -> Result<bool, CacheError> {
        self.inner.lock().remove(key)
    }

    pub fn is_cached(&self, key: &K) -> bool {
        self.inner.lock().is_cached(key)
    }

    /// Returns a clone of the value without setting its reference bit.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Applies `f` to the value without cloning or setting its reference bit.
    pub fn peek_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().peek(key).map(f)
    }

    pub fn page_type(&self, key: &K) -> Option<PageType> {
        self.inner.lock().page_type(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn ghost_len(&self) -> usize {
        self.inner.lock().ghost_len()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_inner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ClockProCache<K, V>) -> R,
    {
        f(&mut self.inner.lock())
    }
}

impl<K, V> From<ClockProCache<K, V>> for ConcurrentClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn from(cache: ClockProCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V> ConcurrentCache for ConcurrentClockProCache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Send,
{
}
