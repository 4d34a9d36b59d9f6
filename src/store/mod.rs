//! Per-key storage backing the replacement policies.

pub mod resident;

pub use resident::{ResidentEntry, ResidentStore};
