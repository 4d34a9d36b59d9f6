pub mod clock_ring;
pub mod slot_arena;

pub use clock_ring::{ClockRing, Hand, PageType};
pub use slot_arena::{SlotArena, SlotId};
