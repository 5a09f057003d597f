//! # Runner Configuration
//!
//! One TOML file, loaded once at startup:
//!
//! ```toml
//! [field]
//! target_count = 50
//! seed = 7
//!
//! [runner]
//! tick_rate = 60
//! duration_secs = 30
//! simulated = true
//! ```
//!
//! Missing tables and keys fall back to defaults.

use backdrop_core::SimDuration;
use backdrop_field::FieldConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Highest accepted frame rate.
pub const MAX_TICK_RATE: u32 = 1_000;

/// Longest accepted run, one year.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 3_600;

/// How the runner paces its frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Frames per second.
    pub tick_rate: u32,
    /// Stop after this much (simulated or wall) time. `None` runs until
    /// cancelled.
    pub duration_secs: Option<u64>,
    /// Fast-forward a manual clock instead of sleeping between frames.
    pub simulated: bool,
    /// Frames between two reports.
    pub report_every: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            duration_secs: None,
            simulated: false,
            report_every: 60,
        }
    }
}

impl RunnerConfig {
    /// Simulated run of `secs` seconds.
    #[must_use]
    pub fn simulated_for(secs: u64) -> Self {
        Self {
            duration_secs: Some(secs),
            simulated: true,
            ..Self::default()
        }
    }

    /// Length of one frame.
    #[must_use]
    pub fn frame_duration(&self) -> SimDuration {
        SimDuration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }

    /// Run length, if bounded.
    #[must_use]
    pub fn duration(&self) -> Option<SimDuration> {
        self.duration_secs.map(SimDuration::from_secs)
    }

    /// Checks frame rate, run length and report cadence.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRunner`] when `tick_rate` is outside
    /// `1..=1000`, `duration_secs` exceeds [`MAX_DURATION_SECS`] or
    /// `report_every` is zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return Err(AppError::InvalidRunner(format!(
                "tick_rate must be in 1..={MAX_TICK_RATE}, got {}",
                self.tick_rate
            )));
        }
        if let Some(secs) = self.duration_secs {
            if secs > MAX_DURATION_SECS {
                return Err(AppError::InvalidRunner(format!(
                    "duration_secs must be at most {MAX_DURATION_SECS}, got {secs}"
                )));
            }
        }
        if self.report_every == 0 {
            return Err(AppError::InvalidRunner(
                "report_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything `backdrop_sim` reads from its config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// The particle field.
    pub field: FieldConfig,
    /// Frame pacing.
    pub runner: RunnerConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] for malformed TOML, otherwise the validation
    /// errors of both sections.
    pub fn from_toml_str(source: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`AppError::Io`] if the file cannot be read, otherwise as
    /// [`AppConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// See [`FieldConfig::validate`] and [`RunnerConfig::validate`].
    pub fn validate(&self) -> AppResult<()> {
        self.field.validate()?;
        self.runner.validate()
    }
}
