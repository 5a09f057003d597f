//! # Memory Management
//!
//! Fixed-capacity storage for short-lived objects.
//!
//! A container of decorative elements has a hard upper bound on its live
//! children, so storage is allocated once at creation and slots are reused
//! as elements expire.

mod pool;

pub use pool::{SlotHandle, SlotPool};
