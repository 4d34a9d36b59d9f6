//! Policy metrics (feature `metrics`).
//!
//! [`ClockProMetrics`](metrics_impl::ClockProMetrics) is updated in place by
//! the cache; [`snapshot`] copies it out together with point-in-time gauges,
//! and [`exporter`] renders snapshots for monitoring.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
