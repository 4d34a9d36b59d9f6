//! clockpro: a CLOCK-Pro replacement policy cache.
//!
//! [`ClockProCache`](policy::clock_pro::ClockProCache) keeps a bounded set of
//! resident values split into hot and cold pages and remembers recently
//! evicted keys as test pages. Misses can be filled through a read callback
//! and evicted values handed to a write callback.
//!
//! ```
//! use clockpro::prelude::*;
//!
//! let mut cache = ClockProBuilder::new(2)
//!     .read_fn(|key: &u32| Ok(key * 2))
//!     .build();
//!
//! assert_eq!(cache.get(&4).unwrap(), 8);
//! assert_eq!(cache.stats().get_misses, 1);
//! ```
//!
//! ## Features
//!
//! - `metrics` (default): policy counters, snapshots and a Prometheus text
//!   exporter.
//! - `concurrency`: `ConcurrentClockProCache`, a `parking_lot` based shared
//!   wrapper.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod stats;
pub mod store;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use crate::builder::ClockProBuilder;
pub use crate::error::{CacheError, ConfigError, InvariantError};
pub use crate::policy::clock_pro::ClockProCache;
pub use crate::stats::CacheStats;
