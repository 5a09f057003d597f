//! # BACKDROP
//!
//! Headless runner for the particle field: loads a config, attaches a
//! container to a page and drives it frame by frame, either against the
//! wall clock or on a fast-forwarded simulated clock.
//!
//! ## Example
//!
//! ```rust
//! use backdrop::simulate;
//! use backdrop_field::FieldConfig;
//!
//! let summary = simulate(FieldConfig::default().with_seed(1), 90)?;
//! assert_eq!(summary.stats.live, 50);
//! # Ok::<(), backdrop::AppError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod pacer;
pub mod runner;

pub use config::{AppConfig, RunnerConfig, MAX_DURATION_SECS, MAX_TICK_RATE};
pub use error::{AppError, AppResult};
pub use pacer::{FramePacer, FrameStats};
pub use runner::{simulate, spawn_runner, RunSummary, Runner, RunnerHandle, RunnerReport};
