//! # Particles
//!
//! One ephemeral decorative element: four randomized attributes plus the
//! instants it was born and will expire.
//!
//! The attributes are opaque to this crate. The page styling decides what
//! they look like; here they only set the particle's lifetime
//! (`delay + duration`) and end up in the inline style.

use backdrop_core::{SimDuration, SimInstant};
use rand::Rng;
use std::fmt;

use crate::config::FieldConfig;

/// Spawn serial of a particle, unique within one field.
///
/// Diagnostic only. The field never looks particles up by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub(crate) u64);

impl ParticleId {
    /// The raw serial.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// The four independently sampled attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleAttributes {
    /// Width and height, px.
    pub size: f32,
    /// Horizontal position, percent.
    pub left: f32,
    /// Animation start offset, seconds.
    pub delay: f32,
    /// Animation cycle length, seconds.
    pub duration: f32,
}

impl ParticleAttributes {
    /// Draws size, position, delay and duration, in that order.
    pub fn sample<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Self {
        let size = config.size.sample(rng);
        let left = config.left.sample(rng);
        let delay = config.delay.sample(rng);
        let duration = config.duration.sample(rng);

        Self {
            size,
            left,
            delay,
            duration,
        }
    }

    /// Time from spawn until the particle is destroyed.
    ///
    /// Each term is rounded to the microsecond before the sum, so the result
    /// never reaches `delay.max + duration.max`.
    #[must_use]
    pub fn lifetime(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.delay) + SimDuration::from_secs_f32(self.duration)
    }

    /// Returns true if every attribute lies in its configured range.
    #[must_use]
    pub fn within(&self, config: &FieldConfig) -> bool {
        config.size.contains(self.size)
            && config.left.contains(self.left)
            && config.delay.contains(self.delay)
            && config.duration.contains(self.duration)
    }
}

/// A live particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    id: ParticleId,
    generation: u32,
    attributes: ParticleAttributes,
    born_at: SimInstant,
    expires_at: SimInstant,
}

impl Particle {
    pub(crate) fn new(
        id: ParticleId,
        generation: u32,
        attributes: ParticleAttributes,
        born_at: SimInstant,
    ) -> Self {
        Self {
            id,
            generation,
            attributes,
            born_at,
            expires_at: born_at + attributes.lifetime(),
        }
    }

    /// Spawn serial.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ParticleId {
        self.id
    }

    /// 0 for particles created at initialization, +1 per replacement.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// The sampled attributes.
    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> &ParticleAttributes {
        &self.attributes
    }

    /// When the particle was attached.
    #[inline]
    #[must_use]
    pub const fn born_at(&self) -> SimInstant {
        self.born_at
    }

    /// When the respawn timer fires.
    #[inline]
    #[must_use]
    pub const fn expires_at(&self) -> SimInstant {
        self.expires_at
    }

    /// Inline style consumed by the page's particle animation.
    #[must_use]
    pub fn inline_style(&self) -> String {
        let a = &self.attributes;
        format!(
            "width: {size:.2}px; height: {size:.2}px; left: {left:.2}%; \
             animation-delay: {delay:.2}s; animation-duration: {duration:.2}s;",
            size = a.size,
            left = a.left,
            delay = a.delay,
            duration = a.duration,
        )
    }
}
