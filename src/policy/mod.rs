//! Replacement policies.

pub mod clock_pro;
