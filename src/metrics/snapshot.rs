use crate::metrics::metrics_impl::ClockProMetrics;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockProMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub cold_to_hot_promotions: u64,
    pub hot_to_cold_demotions: u64,
    pub test_insertions: u64,
    pub test_hits: u64,
    pub test_expirations: u64,

    pub hot_hand_steps: u64,
    pub cold_hand_steps: u64,
    pub test_hand_steps: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub hot_len: usize,
    pub cold_len: usize,
    pub ghost_len: usize,
    pub cold_target: usize,
    pub capacity: usize,
}

impl ClockProMetricsSnapshot {
    /// Copies the counters; gauges are left for the caller to fill in.
    pub fn from_counters(metrics: &ClockProMetrics) -> Self {
        Self {
            get_calls: metrics.get_calls,
            get_hits: metrics.get_hits,
            get_misses: metrics.get_misses,
            insert_calls: metrics.insert_calls,
            insert_updates: metrics.insert_updates,
            insert_new: metrics.insert_new,
            evict_calls: metrics.evict_calls,
            evicted_entries: metrics.evicted_entries,
            cold_to_hot_promotions: metrics.cold_to_hot_promotions,
            hot_to_cold_demotions: metrics.hot_to_cold_demotions,
            test_insertions: metrics.test_insertions,
            test_hits: metrics.test_hits,
            test_expirations: metrics.test_expirations,
            hot_hand_steps: metrics.hot_hand_steps,
            cold_hand_steps: metrics.cold_hand_steps,
            test_hand_steps: metrics.test_hand_steps,
            ..Self::default()
        }
    }
}
