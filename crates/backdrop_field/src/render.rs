//! # Rendering
//!
//! Two outputs for whatever draws the field:
//! - HTML: the container and one styled child per particle, as the page
//!   styling expects them
//! - Instance records: a flat `Pod` array for GPU-style upload

use bytemuck::{Pod, Zeroable};
use std::fmt::Write;

use crate::field::ParticleField;
use crate::particle::Particle;

/// Class of the container element.
pub const CONTAINER_CLASS: &str = "particles";
/// Class of each particle element.
pub const PARTICLE_CLASS: &str = "particle";

/// A particle as a renderer sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Width and height, px.
    pub size: f32,
    /// Horizontal position, percent.
    pub left: f32,
    /// Animation start offset, seconds.
    pub delay: f32,
    /// Animation cycle length, seconds.
    pub duration: f32,
    /// Spawn instant, seconds since field origin.
    pub born_at_secs: f32,
    /// Expiry instant, seconds since field origin.
    pub expires_at_secs: f32,
    /// Replacement generation.
    pub generation: u32,
    /// Keeps the record 16-byte aligned.
    pub _pad: u32,
}

impl ParticleInstance {
    /// Size of one record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Builds the record for a live particle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_particle(particle: &Particle) -> Self {
        let a = particle.attributes();
        Self {
            size: a.size,
            left: a.left,
            delay: a.delay,
            duration: a.duration,
            born_at_secs: particle.born_at().as_secs_f64() as f32,
            expires_at_secs: particle.expires_at().as_secs_f64() as f32,
            generation: particle.generation(),
            _pad: 0,
        }
    }
}

/// Renders one container with its live particles, in slot order.
///
/// A detached field renders as an empty container.
#[must_use]
pub fn container_html<R>(field: &ParticleField<R>) -> String
where
    R: rand::Rng,
{
    let mut html = format!("<div class=\"{CONTAINER_CLASS}\">");
    for particle in field.particles() {
        // Writing into a String cannot fail
        let _ = write!(
            html,
            "<div class=\"{PARTICLE_CLASS}\" style=\"{}\"></div>",
            particle.inline_style()
        );
    }
    html.push_str("</div>");
    html
}
