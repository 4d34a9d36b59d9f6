//! Builder for [`ClockProCache`].
//!
//! Collects the capacity and the optional read/write callbacks, then
//! validates them in one place.
//!
//! ## Example
//!
//! ```rust
//! use clockpro::builder::ClockProBuilder;
//!
//! let mut cache = ClockProBuilder::new(100)
//!     .read_fn(|key: &u64| Ok(format!("row-{key}")))
//!     .write_fn(|_key: &u64, _value: String| {})
//!     .build();
//!
//! assert_eq!(cache.get(&7).unwrap(), "row-7");
//! assert!(cache.is_cached(&7));
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::{ConfigError, LoadError};
use crate::policy::clock_pro::{ClockProCache, ReadFn, WriteFn};

/// Builder for a [`ClockProCache`] with callbacks.
pub struct ClockProBuilder<K, V> {
    capacity: usize,
    reader: Option<ReadFn<K, V>>,
    writer: Option<WriteFn<K, V>>,
}

impl<K, V> ClockProBuilder<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Starts a builder for a cache of `capacity` resident entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reader: None,
            writer: None,
        }
    }

    /// Replaces the capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the callback used to load values on a miss.
    pub fn read_fn<F>(mut self, read: F) -> Self
    where
        F: FnMut(&K) -> Result<V, LoadError> + Send + 'static,
    {
        self.reader = Some(Box::new(read));
        self
    }

    /// Sets the callback that receives values dropped by eviction.
    pub fn write_fn<F>(mut self, write: F) -> Self
    where
        F: FnMut(&K, V) + Send + 'static,
    {
        self.writer = Some(Box::new(write));
        self
    }

    /// Builds the cache, returning an error for invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use clockpro::builder::ClockProBuilder;
    ///
    /// assert!(ClockProBuilder::<u64, u64>::new(0).try_build().is_err());
    /// assert!(ClockProBuilder::<u64, u64>::new(8).try_build().is_ok());
    /// ```
    pub fn try_build(self) -> Result<ClockProCache<K, V>, ConfigError> {
        let mut cache = ClockProCache::try_new(self.capacity)?;
        cache.install_callbacks(self.reader, self.writer);
        Ok(cache)
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero. Use [`try_build`](Self::try_build)
    /// for a non-panicking alternative.
    pub fn build(self) -> ClockProCache<K, V> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<K, V> fmt::Debug for ClockProBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockProBuilder")
            .field("capacity", &self.capacity)
            .field("read_fn", &self.reader.is_some())
            .field("write_fn", &self.writer.is_some())
            .finish()
    }
}
