pub use crate::builder::ClockProBuilder;
pub use crate::ds::{Hand, PageType};
pub use crate::error::{CacheError, ConfigError, InvariantError, LoadError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::ClockProMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
#[cfg(feature = "concurrency")]
pub use crate::policy::clock_pro::ConcurrentClockProCache;
pub use crate::policy::clock_pro::ClockProCache;
pub use crate::stats::CacheStats;
pub use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};
