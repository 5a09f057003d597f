//! # Simulated Time
//!
//! Instants and durations are whole microseconds in a `u64`.
//!
//! ## Design
//!
//! Timer keys must be totally ordered and exact, so nothing here is a float.
//! Conversions from seconds round to the nearest microsecond once, at the
//! boundary, and every later sum is integer arithmetic.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::time::Instant;

/// Microseconds per second.
const MICROS_PER_SEC: u64 = 1_000_000;

/// A span of simulated time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimDuration(u64);

impl SimDuration {
    /// Zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole microseconds.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Creates a duration from whole milliseconds, saturating at `u64::MAX` µs.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    /// Creates a duration from whole seconds, saturating at `u64::MAX` µs.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(MICROS_PER_SEC))
    }

    /// Creates a duration from fractional seconds, rounded to the nearest
    /// microsecond. Negative and NaN inputs become zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs_f32(secs: f32) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((f64::from(secs) * 1e6).round() as u64)
    }

    /// Converts a wall-clock duration.
    #[must_use]
    pub fn from_std(duration: std::time::Duration) -> Self {
        Self(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
    }

    /// Whole microseconds.
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Fractional seconds.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for SimDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// A point on the simulated timeline, measured from the field's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimInstant(u64);

impl SimInstant {
    /// The origin of the timeline.
    pub const ZERO: Self = Self(0);

    /// Creates an instant from microseconds since the origin.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Microseconds since the origin.
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Seconds since the origin.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }

    /// Time elapsed since `earlier`, zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> SimDuration {
        SimDuration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<SimDuration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: SimDuration) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign<SimDuration> for SimInstant {
    fn add_assign(&mut self, rhs: SimDuration) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for SimInstant {
    type Output = SimDuration;

    fn sub(self, rhs: Self) -> SimDuration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Display for SimInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t+{:.3}s", self.as_secs_f64())
    }
}

/// Source of the current simulated instant.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> SimInstant;
}

/// A clock that only moves when told to.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now: SimInstant,
}

impl ManualClock {
    /// Creates a clock at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: SimInstant::ZERO,
        }
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, by: SimDuration) -> SimInstant {
        self.now += by;
        self.now
    }

    /// Jumps to `to`. Never moves backwards.
    pub fn set(&mut self, to: SimInstant) {
        self.now = self.now.max(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SimInstant {
        self.now
    }
}

/// Wall-clock time since the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current wall-clock instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> SimInstant {
        SimInstant::ZERO + SimDuration::from_std(self.origin.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs_f32_rounds_to_micros() {
        assert_eq!(SimDuration::from_secs_f32(1.5).as_micros(), 1_500_000);
        assert_eq!(SimDuration::from_secs_f32(0.000_000_4).as_micros(), 0);
        assert_eq!(SimDuration::from_secs_f32(-3.0), SimDuration::ZERO);
        assert_eq!(SimDuration::from_secs_f32(f32::NAN), SimDuration::ZERO);
    }

    #[test]
    fn test_largest_lifetime_stays_below_bound() {
        // Largest f32 values below 20 and 25
        let delay = SimDuration::from_secs_f32(19.999_998);
        let duration = SimDuration::from_secs_f32(24.999_998);
        assert!(delay + duration < SimDuration::from_secs(45));
    }

    #[test]
    fn test_whole_unit_constructors_saturate() {
        assert_eq!(SimDuration::from_secs(u64::MAX).as_micros(), u64::MAX);
        assert_eq!(SimDuration::from_millis(u64::MAX).as_micros(), u64::MAX);
        assert_eq!(
            SimDuration::from_secs(u64::MAX / 2),
            SimDuration::from_micros(u64::MAX)
        );
        assert_eq!(SimDuration::from_secs(7).as_micros(), 7_000_000);
    }

    #[test]
    fn test_instant_arithmetic() {
        let start = SimInstant::from_micros(500);
        let later = start + SimDuration::from_millis(2);
        assert_eq!(later.as_micros(), 2_500);
        assert_eq!(later - start, SimDuration::from_micros(2_000));
        assert_eq!(start - later, SimDuration::ZERO);
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let mut clock = ManualClock::new();
        clock.advance(SimDuration::from_secs(3));
        clock.set(SimInstant::from_micros(1));
        assert_eq!(clock.now(), SimInstant::ZERO + SimDuration::from_secs(3));
    }

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::start();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
