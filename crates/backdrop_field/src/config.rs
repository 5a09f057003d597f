//! # Field Configuration
//!
//! Tunables for a particle field, loadable from TOML.
//!
//! Every key is optional. The defaults are the values the page styling was
//! designed around: 50 particles, sizes in [2, 8) px, horizontal positions in
//! [0, 100) %, delays in [0, 20) s and durations in [15, 25) s.
//!
//! ```toml
//! target_count = 50
//! seed = 7
//! size = { min = 2.0, max = 8.0 }
//! duration = { min = 15.0, max = 25.0 }
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FieldError, FieldResult};

/// Default number of live particles.
pub const DEFAULT_TARGET_COUNT: usize = 50;

/// Largest accepted population. Container and timer storage are allocated
/// up front for this many particles.
pub const MAX_TARGET_COUNT: usize = 100_000;

/// A half-open sampling interval `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (exclusive).
    pub max: f32,
}

impl SampleRange {
    /// Creates a range. Not validated until [`FieldConfig::validate`].
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a uniform value in `[min, max)`.
    ///
    /// The range must have been validated; an empty range panics inside `rand`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.min..self.max)
    }

    /// Returns true if `value` lies in `[min, max)`.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &'static str, ceiling: Option<f32>) -> FieldResult<()> {
        let bounded = ceiling.map_or(true, |c| self.max <= c);
        if self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min < self.max
            && bounded
        {
            Ok(())
        } else {
            Err(FieldError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Configuration for one particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Number of live particles kept in the container.
    pub target_count: usize,
    /// Seed for the default generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Width and height, in px.
    pub size: SampleRange,
    /// Horizontal position, in percent of the container width.
    pub left: SampleRange,
    /// Start offset before the animation begins, in seconds.
    pub delay: SampleRange,
    /// Length of one animation cycle, in seconds.
    pub duration: SampleRange,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            seed: None,
            size: SampleRange::new(2.0, 8.0),
            left: SampleRange::new(0.0, 100.0),
            delay: SampleRange::new(0.0, 20.0),
            duration: SampleRange::new(15.0, 25.0),
        }
    }
}

impl FieldConfig {
    /// Overrides the target count.
    #[must_use]
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Fixes the generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidConfig`] on malformed TOML or unknown keys,
    /// and the validation errors of [`FieldConfig::validate`].
    pub fn from_toml_str(source: &str) -> FieldResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| FieldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidConfig`] if the file cannot be read,
    /// otherwise as [`FieldConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| FieldError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks the target count and every sampling range.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidConfig`] for a target count outside
    /// `1..=`[`MAX_TARGET_COUNT`] and [`FieldError::InvalidRange`] for an
    /// empty, negative or non-finite range, or a horizontal range reaching
    /// past 100 %.
    pub fn validate(&self) -> FieldResult<()> {
        if self.target_count == 0 {
            return Err(FieldError::InvalidConfig(
                "target_count must be at least 1".to_string(),
            ));
        }
        if self.target_count > MAX_TARGET_COUNT {
            return Err(FieldError::InvalidConfig(format!(
                "target_count must be at most {MAX_TARGET_COUNT}, got {}",
                self.target_count
            )));
        }
        self.size.validate("size", None)?;
        self.left.validate("left", Some(100.0))?;
        self.delay.validate("delay", None)?;
        self.duration.validate("duration", None)?;
        Ok(())
    }

    /// Longest lifetime a particle can have (exclusive bound), in seconds.
    #[must_use]
    pub fn max_lifetime_secs(&self) -> f32 {
        self.delay.max + self.duration.max
    }
}
