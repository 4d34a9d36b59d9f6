//! Hand actions and the work-stack dispatcher that chains them.
//!
//! The three hands call into each other: a hot step may first need a test
//! step, a test step may first need a cold step, and a cold step that
//! touched a cold page trims ghosts and rebalances the hot region. Instead
//! of recursing, every cascade is expressed as [`Sweep`] tasks on an explicit
//! stack, popped in LIFO order so nested work finishes before the task that
//! requested it.
//!
//! ```text
//!   Evict ──► Cold ──► (acted on cold page) ──► TrimGhosts ──► Test ──► ...
//!     │                                     └─► BalanceHot ──► Hot  ──► ...
//!     └─► Hot (only when no cold page is left)
//!
//!   Hot  = [Test if hot hand == test hand] then HotAct
//!   Test = [Cold if test hand == cold hand] then TestAct
//!
//!   ExpireGhosts ──► TestAct ──► ...   (explicit removal only)
//! ```
//!
//! Each public operation gets a budget of hand actions proportional to the
//! square of the ring length; running out means the bookkeeping is broken
//! and surfaces as [`CacheError::InvalidState`].

use std::hash::Hash;

use crate::ds::clock_ring::{Hand, PageType};
use crate::error::CacheError;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{ClockProMetricsRecorder, CoreMetricsRecorder};

use super::ClockProCache;

const STEP_BUDGET_FACTOR: usize = 32;

/// A unit of pending hand work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sweep {
    /// Free resident slots until one more page fits.
    Evict,
    /// Hot step including its test-hand precondition.
    Hot,
    HotAct,
    /// Test step including its cold-hand precondition.
    Test,
    TestAct,
    /// Cold step; schedules trimming and balancing when it acted on a cold page.
    Cold,
    /// Destroy test pages while there are more than `capacity` of them.
    TrimGhosts,
    /// Like `TrimGhosts`, but the test hand never waits on the cold hand, so
    /// no resident page changes state.
    ExpireGhosts,
    /// Run the hot hand while the hot region is above its target.
    BalanceHot,
}

/// Maximum number of hand actions one operation may perform on a ring of
/// `ring_len` records.
#[inline]
pub(crate) fn step_budget(ring_len: usize) -> usize {
    let n = ring_len.saturating_add(2);
    n.saturating_mul(n).saturating_mul(STEP_BUDGET_FACTOR)
}

/// Reports a ring/store mismatch found mid-sweep.
pub(crate) fn desync(what: &str) -> CacheError {
    log::error!("clock-pro state corrupted: {}", what);
    CacheError::invalid_state(what)
}

impl<K, V> ClockProCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Runs `root` and everything it cascades into.
    pub(crate) fn sweep(&mut self, root: Sweep) -> Result<(), CacheError> {
        let budget = step_budget(self.ring.len());
        let mut acts = 0usize;
        let mut stack = vec![root];

        while let Some(task) = stack.pop() {
            if matches!(task, Sweep::HotAct | Sweep::TestAct | Sweep::Cold) {
                acts += 1;
                if acts > budget {
                    log::error!(
                        "clock-pro sweep exceeded {} hand steps (ring_len={}, hot={}, cold={}, test={})",
                        budget,
                        self.ring.len(),
                        self.hot_count,
                        self.cold_count,
                        self.test_count
                    );
                    return Err(CacheError::invalid_state(format!(
                        "hand sweep did not terminate within {} steps",
                        budget
                    )));
                }
            }

            match task {
                Sweep::Evict => {
                    if self.capacity > 0 && self.hot_count + self.cold_count >= self.capacity {
                        stack.push(Sweep::Evict);
                        if self.cold_count == 0 {
                            stack.push(Sweep::Hot);
                        } else {
                            stack.push(Sweep::Cold);
                        }
                    }
                },
                Sweep::Hot => {
                    stack.push(Sweep::HotAct);
                    if self.ring.hands_meet(Hand::Hot, Hand::Test) {
                        stack.push(Sweep::Test);
                    }
                },
                Sweep::HotAct => self.hot_act()?,
                Sweep::Test => {
                    stack.push(Sweep::TestAct);
                    if self.ring.hands_meet(Hand::Test, Hand::Cold) {
                        stack.push(Sweep::Cold);
                    }
                },
                Sweep::TestAct => self.test_act()?,
                Sweep::Cold => {
                    if self.cold_act()? {
                        // trim runs first, then balance
                        stack.push(Sweep::BalanceHot);
                        stack.push(Sweep::TrimGhosts);
                    }
                },
                Sweep::TrimGhosts => {
                    if self.test_count > self.capacity {
                        stack.push(Sweep::TrimGhosts);
                        stack.push(Sweep::Test);
                    }
                },
                Sweep::ExpireGhosts => {
                    if self.test_count > self.capacity {
                        stack.push(Sweep::ExpireGhosts);
                        stack.push(Sweep::TestAct);
                    }
                },
                Sweep::BalanceHot => {
                    if self.hot_count > self.hot_target() {
                        stack.push(Sweep::BalanceHot);
                        stack.push(Sweep::Hot);
                    }
                },
            }
        }
        Ok(())
    }

    /// Hot hand: clear a referenced hot page, demote an unreferenced one.
    fn hot_act(&mut self) -> Result<(), CacheError> {
        let Some(id) = self.ring.hand(Hand::Hot) else {
            return Ok(());
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_hand_step(Hand::Hot);

        if self.ring.page(id) == Some(PageType::Hot) {
            let demote = {
                let key = self
                    .ring
                    .key(id)
                    .ok_or_else(|| desync("hot hand on a dead record"))?;
                let entry = self
                    .store
                    .get_mut(key)
                    .ok_or_else(|| desync("hot page has no resident entry"))?;
                let demote = !entry.referenced;
                entry.referenced = false;
                demote
            };
            if demote {
                self.ring.set_page(id, PageType::Cold);
                self.hot_count -= 1;
                self.cold_count += 1;
                #[cfg(feature = "metrics")]
                self.metrics.record_hot_to_cold_demotion();
                log::trace!("hot hand demoted a page to cold");
            }
        }
        self.ring.advance(Hand::Hot);
        Ok(())
    }

    /// Test hand: destroy the test page under it and shrink the cold target.
    ///
    /// Removing the record moves the hand to its successor, so a destroyed
    /// page is not followed by an extra advance.
    fn test_act(&mut self) -> Result<(), CacheError> {
        let Some(id) = self.ring.hand(Hand::Test) else {
            return Ok(());
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_hand_step(Hand::Test);

        if self.ring.page(id) != Some(PageType::Test) {
            self.ring.advance(Hand::Test);
            return Ok(());
        }

        let (key, _) = self
            .ring
            .remove(id)
            .ok_or_else(|| desync("test hand on a dead record"))?;
        if self.store.remove(&key).is_none() {
            return Err(desync("test page missing from the store"));
        }
        self.test_count -= 1;
        if self.cold_target > 1 {
            self.cold_target -= 1;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_test_expiry();
        log::trace!(
            "test hand expired a ghost (cold_target={})",
            self.cold_target
        );
        Ok(())
    }

    /// Cold hand: promote a referenced cold page or turn an unreferenced one
    /// into a test page.
    ///
    /// Returns `true` if the hand acted on a cold page, in which case the
    /// caller schedules ghost trimming and hot balancing.
    fn cold_act(&mut self) -> Result<bool, CacheError> {
        let Some(id) = self.ring.hand(Hand::Cold) else {
            return Ok(false);
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_hand_step(Hand::Cold);

        if self.ring.page(id) != Some(PageType::Cold) {
            self.ring.advance(Hand::Cold);
            return Ok(false);
        }

        let referenced = {
            let key = self
                .ring
                .key(id)
                .ok_or_else(|| desync("cold hand on a dead record"))?;
            let entry = self
                .store
                .get_mut(key)
                .ok_or_else(|| desync("cold page has no resident entry"))?;
            let referenced = entry.referenced;
            entry.referenced = false;
            referenced
        };

        if referenced {
            self.ring.set_page(id, PageType::Hot);
            self.cold_count -= 1;
            self.hot_count += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_cold_to_hot_promotion();
            log::trace!("cold hand promoted a page to hot");
        } else {
            {
                let key = self
                    .ring
                    .key(id)
                    .ok_or_else(|| desync("cold hand on a dead record"))?;
                let value = self
                    .store
                    .set_absent(key)
                    .ok_or_else(|| desync("cold page has no resident entry"))?;
                if let Some(writer) = self.writer.as_mut() {
                    writer(key, value);
                }
            }
            self.ring.set_page(id, PageType::Test);
            self.cold_count -= 1;
            self.test_count += 1;
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_evicted_entry();
                self.metrics.record_test_insertion();
            }
            log::debug!(
                "evicted a cold page (resident={}, ghosts={})",
                self.hot_count + self.cold_count,
                self.test_count
            );
        }

        self.ring.advance(Hand::Cold);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_budget_grows_quadratically() {
        assert_eq!(step_budget(0), 4 * STEP_BUDGET_FACTOR);
        assert_eq!(step_budget(2), 16 * STEP_BUDGET_FACTOR);
        assert!(step_budget(1000) > 1000 * 1000);
        assert_eq!(step_budget(usize::MAX), usize::MAX);
    }

    #[test]
    fn cold_step_on_cold_page_ghosts_it_and_calls_writer() {
        use std::sync::{Arc, Mutex};

        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set_write_fn(move |key, value| sink.lock().unwrap().push((*key, value)));
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();

        assert!(cache.cold_act().unwrap());
        assert!(cache.is_ghost(&"a"));
        assert_eq!(cache.cold_len(), 1);
        assert_eq!(cache.ghost_len(), 1);
        assert_eq!(*written.lock().unwrap(), vec![("a", 1)]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn cold_step_promotes_referenced_page() {
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set("a", 1).unwrap();
        cache.get(&"a").unwrap();

        assert!(cache.cold_act().unwrap());
        assert_eq!(cache.page_type(&"a"), Some(PageType::Hot));
        assert_eq!(cache.hot_len(), 1);
        assert_eq!(cache.cold_len(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn cold_step_skips_non_cold_page() {
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        cache.get(&"a").unwrap();
        cache.cold_act().unwrap();
        // cold hand is on "b" now; walk it around to "a" again
        cache.ring.advance(Hand::Cold);

        assert!(!cache.cold_act().unwrap());
        assert_eq!(cache.page_type(&"a"), Some(PageType::Hot));
    }

    #[test]
    fn hot_step_clears_reference_then_demotes() {
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set("a", 1).unwrap();
        cache.get(&"a").unwrap();
        cache.cold_act().unwrap();
        cache.get(&"a").unwrap();

        cache.hot_act().unwrap();
        assert_eq!(cache.page_type(&"a"), Some(PageType::Hot));
        cache.hot_act().unwrap();
        assert_eq!(cache.page_type(&"a"), Some(PageType::Cold));
        assert_eq!(cache.hot_len(), 0);
        assert_eq!(cache.cold_len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_step_destroys_ghost_and_shrinks_cold_target() {
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        cache.cold_act().unwrap();
        assert!(cache.is_ghost(&"a"));

        cache.test_act().unwrap();
        assert!(!cache.is_ghost(&"a"));
        assert_eq!(cache.page_type(&"a"), None);
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.cold_target(), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_step_on_resident_page_only_advances() {
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(4);
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        let before = cache.ring.hand(Hand::Test);

        cache.test_act().unwrap();
        assert_ne!(cache.ring.hand(Hand::Test), before);
        assert_eq!(cache.cold_target(), 4);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn evict_sweep_drains_all_hot_resident_set() {
        let mut cache: ClockProCache<u32, u32> = ClockProCache::new(2);
        cache.set(1, 1).unwrap();
        cache.set(2, 2).unwrap();
        cache.get(&1).unwrap();
        cache.get(&2).unwrap();
        cache.cold_act().unwrap();
        cache.cold_act().unwrap();
        assert_eq!(cache.hot_len(), 2);
        assert_eq!(cache.cold_len(), 0);

        cache.sweep(Sweep::Evict).unwrap();
        assert!(cache.len() < 2);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn expire_ghosts_never_runs_the_cold_hand() {
        use std::sync::{Arc, Mutex};

        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);
        let mut cache: ClockProCache<&str, i32> = ClockProCache::new(2);
        cache.set_write_fn(move |key, value| sink.lock().unwrap().push((*key, value)));
        for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            cache.set(key, value).unwrap();
        }
        assert_eq!(*written.lock().unwrap(), vec![("a", 1), ("b", 2)]);

        // park the test hand on the cold hand's unreferenced page "c"
        cache.ring.advance(Hand::Test);
        cache.ring.advance(Hand::Test);
        assert!(cache.ring.hands_meet(Hand::Test, Hand::Cold));
        assert_eq!(cache.page_type(&"c"), Some(PageType::Cold));

        assert_eq!(cache.remove(&"d"), Ok(true));
        assert!(cache.is_cached(&"c"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ghost_len(), 2);
        assert_eq!(*written.lock().unwrap(), vec![("a", 1), ("b", 2)]);
        cache.check_invariants().unwrap();
    }
}
