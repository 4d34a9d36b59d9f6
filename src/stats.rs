//! Always-on hit/miss counters.
//!
//! Unlike the feature-gated [`metrics`](crate::metrics) module these four
//! counters are part of the cache contract and are kept in every build.

use std::fmt;

/// Get/set hit and miss counts of a cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// `get` calls answered from a resident page.
    pub get_hits: u64,
    /// `get` calls that had to go to the read callback.
    pub get_misses: u64,
    /// `set` calls that overwrote a resident page.
    pub set_hits: u64,
    /// `set` calls that inserted a new page (including ghost hits).
    pub set_misses: u64,
}

impl CacheStats {
    #[inline]
    pub(crate) fn record_get_hit(&mut self) {
        self.get_hits += 1;
    }

    #[inline]
    pub(crate) fn record_get_miss(&mut self) {
        self.get_misses += 1;
    }

    #[inline]
    pub(crate) fn record_set_hit(&mut self) {
        self.set_hits += 1;
    }

    #[inline]
    pub(crate) fn record_set_miss(&mut self) {
        self.set_misses += 1;
    }

    /// Total `get` calls.
    pub fn gets(&self) -> u64 {
        self.get_hits + self.get_misses
    }

    /// Total `set` calls.
    pub fn sets(&self) -> u64 {
        self.set_hits + self.set_misses
    }

    /// Fraction of `get` calls served from cache, `0.0` when there were none.
    pub fn get_hit_rate(&self) -> f64 {
        let total = self.gets();
        if total == 0 {
            0.0
        } else {
            self.get_hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ get_hits: {}, get_misses: {}, hit_rate: {:.2}%, set_hits: {}, set_misses: {} }}",
            self.get_hits,
            self.get_misses,
            self.get_hit_rate() * 100.0,
            self.set_hits,
            self.set_misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_is_zero() {
        let stats = CacheStats::default();
        assert_eq!(stats.gets(), 0);
        assert_eq!(stats.sets(), 0);
        assert_eq!(stats.get_hit_rate(), 0.0);
    }

    #[test]
    fn stats_hit_rate() {
        let mut stats = CacheStats::default();
        stats.record_get_hit();
        stats.record_get_hit();
        stats.record_get_hit();
        stats.record_get_miss();
        assert_eq!(stats.gets(), 4);
        assert!((stats.get_hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_display() {
        let mut stats = CacheStats::default();
        stats.record_set_hit();
        stats.record_set_miss();
        let text = stats.to_string();
        assert!(text.contains("set_hits: 1"));
        assert!(text.contains("set_misses: 1"));
        assert_eq!(stats.sets(), 2);
    }
}
