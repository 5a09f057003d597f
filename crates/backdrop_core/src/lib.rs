//! # BACKDROP Core
//!
//! Storage and time primitives shared by the particle field and its runner:
//! - A fixed-capacity slot pool whose handles go stale once freed
//! - Simulated time in whole microseconds (totally ordered, exact)
//! - Clocks for simulated and wall-clock driving
//!
//! ## Example
//!
//! ```rust
//! use backdrop_core::{Clock, ManualClock, SimDuration, SlotPool};
//!
//! let mut pool: SlotPool<&str> = SlotPool::new(2);
//! let handle = pool.allocate("spark").expect("pool has room");
//! assert_eq!(pool.get(handle), Some(&"spark"));
//!
//! let mut clock = ManualClock::new();
//! clock.advance(SimDuration::from_secs_f32(1.5));
//! assert_eq!(clock.now().as_micros(), 1_500_000);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod time;

pub use memory::{SlotHandle, SlotPool};
pub use time::{Clock, ManualClock, MonotonicClock, SimDuration, SimInstant};
