//! CLOCK-Pro cache replacement policy.
//!
//! Resident pages are classified as **hot** (proven reuse) or **cold**
//! (recently added, possibly one-shot). Cold pages that leave the cache keep
//! a **test** record (a ghost) for a while; a key that comes back while its
//! ghost is still tracked is re-admitted directly as hot.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │                       ClockProCache<K, V> Layout                          │
//! │                                                                           │
//! │   ┌─────────────────────────────────────────────────────────────────────┐ │
//! │   │  store: ResidentStore<K, V>                                         │ │
//! │   │    key -> (ring SlotId, Some(value, ref bit))   hot / cold pages    │ │
//! │   │    key -> (ring SlotId, None)                   test pages          │ │
//! │   └─────────────────────────────────────────────────────────────────────┘ │
//! │                                                                           │
//! │   ┌─────────────────────────────────────────────────────────────────────┐ │
//! │   │  ring: ClockRing<K>   (one record per tracked key)                  │ │
//! │   │                                                                     │ │
//! │   │      hand_hot            hand_cold                hand_test         │ │
//! │   │         │                    │                        │             │ │
//! │   │         ▼                    ▼                        ▼             │ │
//! │   │   ──► [A:H] ──► [B:C] ──► [C:C] ──► [D:T] ──► [E:H] ──► [F:T] ──┐   │ │
//! │   │   └─────────────────────────────────────────────────────────────┘   │ │
//! │   │   new records are linked just before hand_hot                       │ │
//! │   └─────────────────────────────────────────────────────────────────────┘ │
//! │                                                                           │
//! │   hot_count + cold_count <= capacity      test_count <= capacity          │
//! │   hot target = capacity - cold_target     cold_target shrinks on expiry   │
//! └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! SET(key, value):
//!   if key resident: overwrite value, set ref bit
//!   elif key is a ghost: drop ghost record, EVICT, link as HOT
//!   else: EVICT, link as COLD
//!
//! GET(key):
//!   if key resident: set ref bit, return value
//!   else: value = read callback(key); SET(key, value); return value
//!
//! EVICT:
//!   while hot + cold >= capacity: cold hand step
//!
//! cold hand step on a cold page:
//!   referenced   -> promote to hot
//!   unreferenced -> drop value (write callback), page becomes TEST
//!   then: test hand until test <= capacity, hot hand until hot <= hot target
//! ```
//!
//! The hand interactions are driven by the work stack in [`sweep`].
//!
//! ## Performance Characteristics
//!
//! | Operation   | Time    | Notes                                   |
//! |-------------|---------|-----------------------------------------|
//! | `get` (hit) | O(1)    | Hash lookup + reference bit             |
//! | `set`       | O(1)*   | *Amortized, eviction may sweep the ring |
//! | `is_cached` | O(1)    | Hash lookup only                        |
//! | `remove`    | O(1)*   | *Ghost trimming may sweep               |
//!
//! ## Example Usage
//!
//! ```
//! use clockpro::policy::clock_pro::ClockProCache;
//!
//! let mut cache: ClockProCache<u64, String> = ClockProCache::new(2);
//! cache.set_read_fn(|key: &u64| Ok(format!("loaded-{key}")));
//!
//! cache.set(1, "one".to_string()).unwrap();
//! cache.set(2, "two".to_string()).unwrap();
//! assert_eq!(cache.get(&1).unwrap(), "one");
//!
//! // A third key pushes the unreferenced cold page out; it stays as a ghost.
//! cache.set(3, "three".to_string()).unwrap();
//! assert!(!cache.is_cached(&2));
//! assert!(cache.is_ghost(&2));
//!
//! // Misses go through the read callback and are cached.
//! assert_eq!(cache.get(&2).unwrap(), "loaded-2");
//! assert!(cache.is_cached(&2));
//! ```

pub(crate) mod sweep;

#[cfg(feature = "concurrency")]
mod concurrent;

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentClockProCache;

use std::fmt;
use std::hash::Hash;

use crate::builder::ClockProBuilder;
use crate::ds::clock_ring::{ClockRing, Hand, PageType};
use crate::error::{CacheError, ConfigError, InvariantError, LoadError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ClockProMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ClockProMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{ClockProMetricsRecorder, CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::stats::CacheStats;
use crate::store::resident::{ResidentEntry, ResidentStore};
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

use self::sweep::{Sweep, desync};

/// Callback that loads a missing value from the backing store.
pub type ReadFn<K, V> = Box<dyn FnMut(&K) -> Result<V, LoadError> + Send>;

/// Callback that receives each value dropped by eviction.
pub type WriteFn<K, V> = Box<dyn FnMut(&K, V) + Send>;

/// CLOCK-Pro cache with hot/cold/test page classification.
///
/// The engine is single-writer: every operation takes `&mut self`. Use
/// `ConcurrentClockProCache` (feature `concurrency`) to share one instance
/// between threads.
pub struct ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    ring: ClockRing<K>,
    store: ResidentStore<K, V>,
    capacity: usize,
    /// Target size of the cold region; the hot target is `capacity - cold_target`.
    cold_target: usize,
    hot_count: usize,
    cold_count: usize,
    test_count: usize,
    stats: CacheStats,
    reader: Option<ReadFn<K, V>>,
    writer: Option<WriteFn<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: ClockProMetrics,
}

impl<K, V> ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache holding at most `capacity` resident entries.
    ///
    /// A capacity of zero yields a cache that never retains anything: `set`
    /// is a no-op and `get` always goes through the read callback. Use
    /// [`try_new`](Self::try_new) to reject zero instead.
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::policy::clock_pro::ClockProCache;
    ///
    /// let cache: ClockProCache<String, i32> = ClockProCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        log::debug!("creating clock-pro cache with capacity {}", capacity);
        Self {
            ring: ClockRing::with_capacity(capacity.saturating_mul(2)),
            store: ResidentStore::with_capacity(capacity.saturating_mul(2)),
            capacity,
            cold_target: capacity,
            hot_count: 0,
            cold_count: 0,
            test_count: 0,
            stats: CacheStats::default(),
            reader: None,
            writer: None,
            #[cfg(feature = "metrics")]
            metrics: ClockProMetrics::default(),
        }
    }

    /// Creates a cache, returning an error instead of accepting zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::policy::clock_pro::ClockProCache;
    ///
    /// assert!(ClockProCache::<u64, u64>::try_new(0).is_err());
    /// assert!(ClockProCache::<u64, u64>::try_new(8).is_ok());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self::new(capacity))
    }

    /// Returns a builder for configuring capacity and callbacks.
    pub fn builder(capacity: usize) -> ClockProBuilder<K, V> {
        ClockProBuilder::new(capacity)
    }

    /// Installs the callback used by [`get`](Self::get) to fill misses.
    pub fn set_read_fn<F>(&mut self, read: F)
    where
        F: FnMut(&K) -> Result<V, LoadError> + Send + 'static,
    {
        self.reader = Some(Box::new(read));
    }

    /// Installs the callback that receives values dropped by eviction.
    ///
    /// It is called once for every cold page that turns into a test page.
    /// Explicit [`remove`](Self::remove), [`clear`](Self::clear) and
    /// overwrites do not call it.
    pub fn set_write_fn<F>(&mut self, write: F)
    where
        F: FnMut(&K, V) + Send + 'static,
    {
        self.writer = Some(Box::new(write));
    }

    pub(crate) fn install_callbacks(
        &mut self,
        reader: Option<ReadFn<K, V>>,
        writer: Option<WriteFn<K, V>>,
    ) {
        self.reader = reader;
        self.writer = writer;
    }

    /// Returns the value for `key`, loading it through the read callback on
    /// a miss.
    ///
    /// A hit sets the page's reference bit. A miss (ghost or unknown key)
    /// calls the read callback and stores the result with [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if no read callback is installed or it
    /// fails; [`CacheError::InvalidState`] if inserting the loaded value hit
    /// corrupted bookkeeping.
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::policy::clock_pro::ClockProCache;
    ///
    /// let mut cache: ClockProCache<u32, u32> = ClockProCache::new(4);
    /// cache.set_read_fn(|key: &u32| Ok(key * 10));
    ///
    /// assert_eq!(cache.get(&3).unwrap(), 30);
    /// assert_eq!(cache.stats().get_misses, 1);
    /// assert_eq!(cache.get(&3).unwrap(), 30);
    /// assert_eq!(cache.stats().get_hits, 1);
    /// ```
    pub fn get(&mut self, key: &K) -> Result<V, CacheError>
    where
        V: Clone,
    {
        if let Some(entry) = self.store.get_mut(key) {
            entry.referenced = true;
            self.stats.record_get_hit();
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
            return Ok(entry.value.clone());
        }

        self.stats.record_get_miss();
        #[cfg(feature = "metrics")]
        self.metrics.record_get_miss();

        let value = self.load(key)?;
        self.set(key.clone(), value.clone())?;
        Ok(value)
    }

    fn load(&mut self, key: &K) -> Result<V, CacheError> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(CacheError::not_found("no read callback installed"));
        };
        reader(key).map_err(|err| {
            log::debug!("read callback failed: {}", err);
            CacheError::not_found(err.to_string())
        })
    }

    /// Inserts or overwrites `key`, returning the previous resident value.
    ///
    /// - resident key: the value is replaced and the reference bit set.
    /// - ghost key: the test record is dropped and the key re-enters as hot.
    /// - unknown key: the key enters as cold.
    ///
    /// New pages may first force an eviction sweep.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidState`] if the sweep found the ring and store out
    /// of sync or did not terminate.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, CacheError> {
        if self.capacity == 0 {
            return Ok(None);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(entry) = self.store.get_mut(&key) {
            let previous = std::mem::replace(&mut entry.value, value);
            entry.referenced = true;
            self.stats.record_set_hit();
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return Ok(Some(previous));
        }

        let page = match self.store.node(&key) {
            Some(ghost) => {
                self.store.remove(&key);
                if self.ring.remove(ghost).is_none() {
                    return Err(desync("ghost key has no ring record"));
                }
                self.test_count -= 1;
                log::debug!("ghost hit, re-admitting key as hot");
                PageType::Hot
            },
            None => PageType::Cold,
        };

        #[cfg(feature = "metrics")]
        {
            if self.hot_count + self.cold_count >= self.capacity {
                self.metrics.record_evict_call();
            }
        }
        self.sweep(Sweep::Evict)?;

        self.stats.record_set_miss();
        #[cfg(feature = "metrics")]
        {
            self.metrics.record_insert_new();
            if page == PageType::Hot {
                self.metrics.record_test_hit();
            }
        }

        let node = self.ring.insert_before_hot(key.clone(), page);
        self.store.set(key, node, ResidentEntry::new(value));
        match page {
            PageType::Hot => self.hot_count += 1,
            _ => self.cold_count += 1,
        }
        Ok(None)
    }

    /// Returns `true` if `key` holds a value. Ghosts are not cached.
    #[inline]
    pub fn is_cached(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    /// Drops the value of a resident key, leaving a test record behind.
    ///
    /// Returns `Ok(false)` for ghosts and unknown keys. The write callback is
    /// not invoked.
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::policy::clock_pro::ClockProCache;
    ///
    /// let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
    /// cache.set("a", 1).unwrap();
    ///
    /// assert_eq!(cache.remove(&"a"), Ok(true));
    /// assert!(!cache.is_cached(&"a"));
    /// assert!(cache.is_ghost(&"a"));
    /// assert_eq!(cache.remove(&"a"), Ok(false));
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<bool, CacheError> {
        self.take(key).map(|value| value.is_some())
    }

    fn take(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        let Some(node) = self.store.node(key) else {
            return Ok(None);
        };
        match self.ring.page(node) {
            Some(PageType::Test) => return Ok(None),
            Some(PageType::Hot) => self.hot_count -= 1,
            Some(PageType::Cold) => self.cold_count -= 1,
            None => return Err(desync("tracked key has no ring record")),
        }

        let value = self
            .store
            .set_absent(key)
            .ok_or_else(|| desync("resident page has no entry"))?;
        self.ring.set_page(node, PageType::Test);
        self.test_count += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_test_insertion();

        self.sweep(Sweep::ExpireGhosts)?;
        Ok(Some(value))
    }

    /// Returns the value for `key` without setting its reference bit.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key).map(|entry| &entry.value)
    }

    /// Returns the page type of a tracked key, `None` if untracked.
    pub fn page_type(&self, key: &K) -> Option<PageType> {
        self.store.node(key).and_then(|node| self.ring.page(node))
    }

    /// Returns `true` if `key` is remembered as a test page.
    #[inline]
    pub fn is_ghost(&self, key: &K) -> bool {
        self.store.is_ghost(key)
    }

    /// Number of resident (hot + cold) entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.hot_count + self.cold_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn hot_len(&self) -> usize {
        self.hot_count
    }

    #[inline]
    pub fn cold_len(&self) -> usize {
        self.cold_count
    }

    /// Number of test (ghost) records.
    #[inline]
    pub fn ghost_len(&self) -> usize {
        self.test_count
    }

    /// Current cold-region target. Starts at `capacity` and shrinks by one,
    /// down to 1, each time the test hand expires a ghost.
    #[inline]
    pub fn cold_target(&self) -> usize {
        self.cold_target
    }

    /// Size the hot region is trimmed back to: `capacity - cold_target`.
    #[inline]
    pub fn hot_target(&self) -> usize {
        self.capacity - self.cold_target
    }

    /// Returns the get/set hit and miss counters.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Forgets every page and ghost and restores the initial cold target.
    ///
    /// Statistics and callbacks are kept; pair with
    /// [`reset_stats`](Self::reset_stats) for a full reset.
    ///
    /// The write callback is not called for the dropped values.
    pub fn clear(&mut self) {
        self.ring.clear();
        self.store.clear();
        self.hot_count = 0;
        self.cold_count = 0;
        self.test_count = 0;
        self.cold_target = self.capacity;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Recomputes every counter from the ring and cross-checks it against
    /// the store and the hands.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let resident = self.hot_count + self.cold_count;
        if resident > self.capacity {
            return Err(InvariantError::new(format!(
                "resident count {} exceeds capacity {}",
                resident, self.capacity
            )));
        }
        if self.test_count > self.capacity {
            return Err(InvariantError::new(format!(
                "test count {} exceeds capacity {}",
                self.test_count, self.capacity
            )));
        }
        if self.capacity > 0 && (self.cold_target == 0 || self.cold_target > self.capacity) {
            return Err(InvariantError::new(format!(
                "cold target {} outside 1..={}",
                self.cold_target, self.capacity
            )));
        }

        for hand in Hand::ALL {
            match self.ring.hand(hand) {
                Some(id) if !self.ring.contains(id) => {
                    return Err(InvariantError::new(format!(
                        "{:?} hand points at a dead record",
                        hand
                    )));
                },
                None if !self.ring.is_empty() => {
                    return Err(InvariantError::new(format!(
                        "{:?} hand parked on a non-empty ring",
                        hand
                    )));
                },
                _ => {},
            }
        }

        let (mut hot, mut cold, mut test, mut walked) = (0, 0, 0, 0);
        for (id, key, page) in self.ring.iter_from(Hand::Hot) {
            walked += 1;
            if self.store.node(key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "{} record {:?} is not the store's node for its key",
                    page, id
                )));
            }
            if page.is_resident() != self.store.contains(key) {
                return Err(InvariantError::new(format!(
                    "{} record {:?} disagrees with store residency",
                    page, id
                )));
            }
            match page {
                PageType::Hot => hot += 1,
                PageType::Cold => cold += 1,
                PageType::Test => test += 1,
            }
        }

        if walked != self.ring.len() {
            return Err(InvariantError::new(format!(
                "walked {} records but ring holds {}",
                walked,
                self.ring.len()
            )));
        }
        if self.ring.len() != self.store.tracked_len() {
            return Err(InvariantError::new(format!(
                "ring holds {} records but store tracks {} keys",
                self.ring.len(),
                self.store.tracked_len()
            )));
        }
        if (hot, cold, test) != (self.hot_count, self.cold_count, self.test_count) {
            return Err(InvariantError::new(format!(
                "counted hot/cold/test {}/{}/{} but cached {}/{}/{}",
                hot, cold, test, self.hot_count, self.cold_count, self.test_count
            )));
        }
        if resident != self.store.resident_len() {
            return Err(InvariantError::new(format!(
                "resident count {} != store resident {}",
                resident,
                self.store.resident_len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns `(key, page)` pairs in hot-hand order.
    pub fn debug_snapshot(&self) -> Vec<(&K, PageType)> {
        self.ring.debug_snapshot()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &ClockProMetrics {
        &self.metrics
    }
}

impl<K, V> ReadOnlyCache<K, V> for ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Does not touch the reference bit.
    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.is_cached(key)
    }

    #[inline]
    fn len(&self) -> usize {
        ClockProCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Inserts through [`ClockProCache::set`].
    ///
    /// # Panics
    ///
    /// Panics if the cache reports [`CacheError::InvalidState`].
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::policy::clock_pro::ClockProCache;
    /// use clockpro::traits::CoreCache;
    ///
    /// let mut cache = ClockProCache::new(2);
    /// cache.insert("a", 1);
    /// assert_eq!(cache.insert("a", 10), Some(1));
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.set(key, value) {
            Ok(previous) => previous,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns a resident value and sets its reference bit. Misses are
    /// counted but never loaded.
    fn get(&mut self, key: &K) -> Option<&V> {
        match self.store.get_mut(key) {
            Some(entry) => {
                entry.referenced = true;
                self.stats.record_get_hit();
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                Some(&entry.value)
            },
            None => {
                self.stats.record_get_miss();
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    fn clear(&mut self) {
        ClockProCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Removes a resident key and returns its value; the key stays tracked
    /// as a ghost.
    ///
    /// # Panics
    ///
    /// Panics if the cache reports [`CacheError::InvalidState`].
    fn remove(&mut self, key: &K) -> Option<V> {
        match self.take(key) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<ClockProMetricsSnapshot> for ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot(&self) -> ClockProMetricsSnapshot {
        ClockProMetricsSnapshot {
            cache_len: self.len(),
            hot_len: self.hot_count,
            cold_len: self.cold_count,
            ghost_len: self.test_count,
            cold_target: self.cold_target,
            capacity: self.capacity,
            ..ClockProMetricsSnapshot::from_counters(&self.metrics)
        }
    }
}

impl<K, V> fmt::Debug for ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockProCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("hot_count", &self.hot_count)
            .field("cold_count", &self.cold_count)
            .field("test_count", &self.test_count)
            .field("cold_target", &self.cold_target)
            .field("stats", &self.stats)
            .finish()
    }
}
