use crate::ds::clock_ring::Hand;
use crate::metrics::traits::{ClockProMetricsRecorder, CoreMetricsRecorder};

// ---------------------------------------------------------------------------
// ClockProMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ClockProMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,
    pub cold_to_hot_promotions: u64,
    pub hot_to_cold_demotions: u64,
    pub test_insertions: u64,
    pub test_hits: u64,
    pub test_expirations: u64,
    pub hot_hand_steps: u64,
    pub cold_hand_steps: u64,
    pub test_hand_steps: u64,
}

impl CoreMetricsRecorder for ClockProMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl ClockProMetricsRecorder for ClockProMetrics {
    fn record_cold_to_hot_promotion(&mut self) {
        self.cold_to_hot_promotions += 1;
    }
    fn record_hot_to_cold_demotion(&mut self) {
        self.hot_to_cold_demotions += 1;
    }
    fn record_test_insertion(&mut self) {
        self.test_insertions += 1;
    }
    fn record_test_hit(&mut self) {
        self.test_hits += 1;
    }
    fn record_test_expiry(&mut self) {
        self.test_expirations += 1;
    }
    fn record_hand_step(&mut self, hand: Hand) {
        match hand {
            Hand::Hot => self.hot_hand_steps += 1,
            Hand::Cold => self.cold_hand_steps += 1,
            Hand::Test => self.test_hand_steps += 1,
        }
    }
}
