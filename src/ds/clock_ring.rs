//! Circular page ring swept by the three CLOCK-Pro hands.
//!
//! Records live in a `SlotArena` and are linked into a circular doubly linked
//! list by `SlotId`. Each hand holds the handle of the node it will process
//! next, so inserting or removing a node never requires recomputing the
//! other hands' positions.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<K>>)
//!   ┌────────┬───────────────────────────────────────────────┐
//!   │ SlotId │ Node { key, page, prev, next }                │
//!   ├────────┼───────────────────────────────────────────────┤
//!   │ id_a   │ { key: A, page: Hot,  prev: id_d, next: id_b }│
//!   │ id_b   │ { key: B, page: Cold, prev: id_a, next: id_c }│
//!   │ id_c   │ { key: C, page: Test, prev: id_b, next: id_d }│
//!   │ id_d   │ { key: D, page: Cold, prev: id_c, next: id_a }│
//!   └────────┴───────────────────────────────────────────────┘
//!
//!            hand_hot                hand_cold
//!               │                        │
//!               ▼                        ▼
//!   ┌──────► [A:Hot] ──► [B:Cold] ──► [C:Test] ──► [D:Cold] ──┐
//!   │                                    ▲                    │
//!   │                                hand_test                │
//!   └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hand maintenance
//!
//! - `insert_before_hot` links the new node as the hot hand's predecessor,
//!   so it is the last node the hot hand reaches. No hand moves.
//! - `remove(id)` retargets every hand that points at `id` to its successor
//!   before unlinking. Hands pointing elsewhere keep their node.
//! - All hands are `Some` iff the ring is non-empty.
//!
//! ## Performance
//!
//! | Operation           | Time |
//! |---------------------|------|
//! | `insert_before_hot` | O(1) |
//! | `remove`            | O(1) |
//! | `advance`           | O(1) |
//! | `iter_from`         | O(n) |
//!
//! `debug_validate_invariants()` is available in debug/test builds.
use std::fmt;

use crate::ds::slot_arena::{SlotArena, SlotId};

/// Classification of a tracked page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    /// Resident and protected; demoted by the hot hand when unreferenced.
    Hot,
    /// Resident and first in line for eviction.
    Cold,
    /// Non-resident ghost of a recently evicted cold page.
    Test,
}

impl PageType {
    /// Returns `true` for pages that hold a value.
    #[inline]
    pub fn is_resident(self) -> bool {
        !matches!(self, PageType::Test)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageType::Hot => "hot",
            PageType::Cold => "cold",
            PageType::Test => "test",
        };
        f.write_str(name)
    }
}

/// One of the three sweeping cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Hot,
    Cold,
    Test,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Hot, Hand::Cold, Hand::Test];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Hand::Hot => 0,
            Hand::Cold => 1,
            Hand::Test => 2,
        }
    }
}

#[derive(Debug)]
struct Node<K> {
    key: K,
    page: PageType,
    prev: SlotId,
    next: SlotId,
}

/// Circular ring of page records with hot, cold and test hands.
#[derive(Debug)]
pub struct ClockRing<K> {
    arena: SlotArena<Node<K>>,
    hands: [Option<SlotId>; 3],
}

impl<K> ClockRing<K> {
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            hands: [None; 3],
        }
    }

    /// Creates an empty ring with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            hands: [None; 3],
        }
    }

    /// Returns the number of records in the ring.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the ring holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is a live record.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the node `hand` will process next.
    #[inline]
    pub fn hand(&self, hand: Hand) -> Option<SlotId> {
        self.hands[hand.slot()]
    }

    /// Returns `true` if both hands point at the same node.
    #[inline]
    pub fn hands_meet(&self, a: Hand, b: Hand) -> bool {
        match (self.hand(a), self.hand(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn key(&self, id: SlotId) -> Option<&K> {
        self.arena.get(id).map(|node| &node.key)
    }

    pub fn page(&self, id: SlotId) -> Option<PageType> {
        self.arena.get(id).map(|node| node.page)
    }

    /// Reclassifies a record; returns `false` if `id` is stale.
    pub fn set_page(&mut self, id: SlotId, page: PageType) -> bool {
        match self.arena.get_mut(id) {
            Some(node) => {
                node.page = page;
                true
            },
            None => false,
        }
    }

    /// Returns the successor of `id`.
    pub fn next(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).map(|node| node.next)
    }

    /// Links a new record immediately before the hot hand.
    ///
    /// On an empty ring the record becomes the target of all three hands.
    pub fn insert_before_hot(&mut self, key: K, page: PageType) -> SlotId {
        let hot = match self.hand(Hand::Hot) {
            Some(hot) => hot,
            None => {
                let id = self.arena.next_id();
                let inserted = self.arena.insert(Node {
                    key,
                    page,
                    prev: id,
                    next: id,
                });
                debug_assert_eq!(id, inserted);
                self.hands = [Some(inserted); 3];
                return inserted;
            },
        };

        let prev = match self.arena.get(hot) {
            Some(node) => node.prev,
            None => hot,
        };
        let id = self.arena.insert(Node {
            key,
            page,
            prev,
            next: hot,
        });
        if let Some(node) = self.arena.get_mut(prev) {
            node.next = id;
        }
        if let Some(node) = self.arena.get_mut(hot) {
            node.prev = id;
        }
        id
    }

    /// Unlinks `id` and returns its key and page type.
    ///
    /// Hands that pointed at `id` move to its successor.
    pub fn remove(&mut self, id: SlotId) -> Option<(K, PageType)> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if next == id {
            self.hands = [None; 3];
        } else {
            for hand in self.hands.iter_mut() {
                if *hand == Some(id) {
                    *hand = Some(next);
                }
            }
            if let Some(node) = self.arena.get_mut(prev) {
                node.next = next;
            }
            if let Some(node) = self.arena.get_mut(next) {
                node.prev = prev;
            }
        }

        self.arena.remove(id).map(|node| (node.key, node.page))
    }

    /// Steps `hand` one node forward and returns its new position.
    pub fn advance(&mut self, hand: Hand) -> Option<SlotId> {
        let current = self.hand(hand)?;
        let next = self.next(current)?;
        self.hands[hand.slot()] = Some(next);
        Some(next)
    }

    /// Iterates once around the ring starting at `hand`.
    pub fn iter_from(&self, hand: Hand) -> ClockRingIter<'_, K> {
        ClockRingIter {
            ring: self,
            current: self.hand(hand),
            remaining: self.len(),
        }
    }

    /// Drops every record and parks all hands.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.hands = [None; 3];
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns `(key, page)` pairs in hot-hand order.
    pub fn debug_snapshot(&self) -> Vec<(&K, PageType)> {
        self.iter_from(Hand::Hot)
            .map(|(_, key, page)| (key, page))
            .collect()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.is_empty() {
            assert!(self.hands.iter().all(Option::is_none));
            return;
        }

        for hand in Hand::ALL {
            let id = self.hand(hand).expect("hand parked on non-empty ring");
            assert!(self.contains(id), "{:?} hand points at a dead node", hand);
        }

        let start = self.hand(Hand::Hot).expect("hot hand missing");
        let mut seen = std::collections::HashSet::new();
        let mut current = start;
        for _ in 0..self.len() {
            assert!(seen.insert(current), "ring revisits a node before closing");
            let node = self.arena.get(current).expect("ring link to dead node");
            let next = self.arena.get(node.next).expect("next link to dead node");
            assert_eq!(next.prev, current);
            current = node.next;
        }
        assert_eq!(current, start, "ring does not close after len steps");
        assert_eq!(seen.len(), self.arena.len());
    }
}

impl<K> Default for ClockRing<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(SlotId, &K, PageType)` once around the ring.
pub struct ClockRingIter<'a, K> {
    ring: &'a ClockRing<K>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K> Iterator for ClockRingIter<'a, K> {
    type Item = (SlotId, &'a K, PageType);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.current?;
        let node = self.ring.arena.get(id)?;
        self.current = Some(node.next);
        self.remaining -= 1;
        Some((id, &node.key, node.page))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
