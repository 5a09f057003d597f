//! # BACKDROP Particle Field
//!
//! A self-sustaining population of decorative particles layered behind page
//! content.
//!
//! ## Design Principles
//!
//! 1. **Constant population** - the container holds `target_count` particles,
//!    dipping to `target_count - 1` only inside a respawn step
//! 2. **Timer is authority** - a particle dies exactly `delay + duration`
//!    after it spawns, whatever its animation is doing
//! 3. **Explicit queue** - pending respawns live in an inspectable timer
//!    queue driven by one dispatch loop, not in nested callbacks
//! 4. **Injectable randomness** - the generator is a parameter; a seed makes
//!    a field reproducible
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      PARTICLE FIELD                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  FieldConfig → sample attributes → SlotPool (container)  │
//! │                        ↓                    ↑            │
//! │               Scheduler (timers) → advance_to → respawn  │
//! │                                             ↓            │
//! │                         inline style / instance records   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use backdrop_core::SimDuration;
//! use backdrop_field::{FieldConfig, ParticleField};
//!
//! let mut field = ParticleField::from_config(FieldConfig::default().with_seed(7))?;
//! assert_eq!(field.live_count(), 50);
//!
//! field.advance_by(SimDuration::from_secs(120));
//! assert_eq!(field.live_count(), 50);
//! # Ok::<(), backdrop_field::FieldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod field;
pub mod page;
pub mod particle;
pub mod render;
pub mod rng;
pub mod scheduler;

pub use cancel::CancellationToken;
pub use config::{FieldConfig, SampleRange, DEFAULT_TARGET_COUNT, MAX_TARGET_COUNT};
pub use error::{FieldError, FieldResult};
pub use field::{FieldStats, ParticleField, Respawn, ORPHAN_BURST};
pub use page::{ContainerId, Page};
pub use particle::{Particle, ParticleAttributes, ParticleId};
pub use render::{container_html, ParticleInstance};
pub use rng::{field_rng, FieldRng};
pub use scheduler::{Scheduler, Timer};
