//! # Particle Field
//!
//! A fixed-capacity container holding a constant population of ephemeral
//! particles.
//!
//! ## Lifecycle
//!
//! 1. `initialize` validates the config and spawns `target_count` particles
//! 2. Every spawn samples four attributes and schedules ONE timer at
//!    `born_at + delay + duration`
//! 3. `advance_to` pops due timers in time order; each fire removes the
//!    particle and spawns its replacement in the same step
//!
//! The timer is the only authority for end of life. Between two dispatch
//! steps the container always holds exactly `target_count` particles.
//!
//! ## Teardown
//!
//! `teardown` models a container removed from its page: particles vanish,
//! pending timers stay queued and fire as orphaned no-ops. Cancelling the
//! field's token instead discards the timers outright.

use backdrop_core::{SimDuration, SimInstant, SlotHandle, SlotPool};
use rand::Rng;

use crate::cancel::CancellationToken;
use crate::config::FieldConfig;
use crate::error::{FieldError, FieldResult};
use crate::particle::{Particle, ParticleAttributes, ParticleId};
use crate::render::ParticleInstance;
use crate::rng::{field_rng, FieldRng};
use crate::scheduler::Scheduler;

/// Orphaned fires within one dispatch that count as a burst.
pub const ORPHAN_BURST: u64 = 16;

/// Statistics from the particle field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Configured population.
    pub target_count: usize,
    /// Currently live particles.
    pub live: usize,
    /// Particles spawned since initialization (including the initial ones).
    pub spawned_total: u64,
    /// Particles destroyed by their timer.
    pub expired_total: u64,
    /// Timers that fired after the container was detached.
    pub orphaned_fires: u64,
    /// Dispatches that ran at least [`ORPHAN_BURST`] orphaned timers.
    pub orphan_bursts: u64,
    /// Timers dropped by cancellation.
    pub discarded_timers: u64,
    /// Highest generation seen.
    pub max_generation: u32,
}

/// One destroy-then-replace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Respawn {
    /// The particle whose timer fired.
    pub expired: ParticleId,
    /// The particle that took its place.
    pub replacement: ParticleId,
    /// Instant of the swap.
    pub at: SimInstant,
}

/// The self-sustaining particle population and its container.
#[derive(Debug)]
pub struct ParticleField<R = FieldRng> {
    config: FieldConfig,
    /// The container's children. Capacity == target count.
    container: SlotPool<Particle>,
    /// One pending timer per live particle while attached.
    timers: Scheduler<SlotHandle>,
    rng: R,
    now: SimInstant,
    next_id: u64,
    detached: bool,
    token: CancellationToken,
    stats: FieldStats,
    /// Respawns performed by the last dispatch.
    respawns: Vec<Respawn>,
}

impl ParticleField<FieldRng> {
    /// Initializes a field with the default generator, seeded from
    /// `config.seed` when present.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`FieldConfig::validate`].
    pub fn from_config(config: FieldConfig) -> FieldResult<Self> {
        let rng = field_rng(config.seed);
        Self::initialize(config, rng)
    }
}

impl<R: Rng> ParticleField<R> {
    /// Creates the container and spawns `target_count` particles at the
    /// origin of the timeline.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`FieldConfig::validate`].
    pub fn initialize(config: FieldConfig, rng: R) -> FieldResult<Self> {
        config.validate()?;

        let target_count = config.target_count;
        let mut field = Self {
            container: SlotPool::new(target_count),
            timers: Scheduler::with_capacity(target_count),
            rng,
            now: SimInstant::ZERO,
            next_id: 0,
            detached: false,
            token: CancellationToken::new(),
            stats: FieldStats {
                target_count,
                ..FieldStats::default()
            },
            respawns: Vec::with_capacity(target_count),
            config,
        };

        for _ in 0..target_count {
            field.spawn_particle()?;
        }
        field.stats.live = field.container.len();

        tracing::debug!(
            target_count,
            seed = ?field.config.seed,
            next_expiry = ?field.next_expiry(),
            "particle field initialized"
        );
        Ok(field)
    }

    /// Creates one particle, attaches it and registers its respawn timer.
    ///
    /// # Errors
    ///
    /// [`FieldError::Detached`] after teardown or cancellation,
    /// [`FieldError::ContainerFull`] when the container already holds
    /// `target_count` particles.
    pub fn spawn_particle(&mut self) -> FieldResult<ParticleId> {
        self.spawn_generation(0)
    }

    fn spawn_generation(&mut self, generation: u32) -> FieldResult<ParticleId> {
        if self.detached {
            return Err(FieldError::Detached);
        }
        if self.container.is_full() {
            return Err(FieldError::ContainerFull {
                capacity: self.container.capacity(),
            });
        }

        let attributes = ParticleAttributes::sample(&self.config, &mut self.rng);
        let id = ParticleId(self.next_id);
        let particle = Particle::new(id, generation, attributes, self.now);
        let expires_at = particle.expires_at();

        let slot = self
            .container
            .allocate(particle)
            .ok_or(FieldError::ContainerFull {
                capacity: self.container.capacity(),
            })?;
        self.next_id += 1;
        self.timers.schedule(expires_at, slot);

        self.stats.spawned_total += 1;
        self.stats.max_generation = self.stats.max_generation.max(generation);
        Ok(id)
    }

    /// Runs every timer due at or before `now`, in time order.
    ///
    /// A replacement whose own timer falls before `now` is handled in the
    /// same call. Returns the respawns performed.
    pub fn advance_to(&mut self, now: SimInstant) -> &[Respawn] {
        self.respawns.clear();

        if self.token.is_cancelled() {
            self.discard_pending();
        }

        let orphaned_before = self.stats.orphaned_fires;
        while let Some(timer) = self.timers.pop_due(now) {
            self.now = self.now.max(timer.fire_at);
            self.fire(timer.payload);
        }

        let orphaned = self.stats.orphaned_fires - orphaned_before;
        if orphaned >= ORPHAN_BURST {
            self.stats.orphan_bursts += 1;
            tracing::warn!(
                orphaned,
                pending = self.timers.len(),
                at = %now,
                "burst of respawn timers fired into a detached container"
            );
        }

        self.now = self.now.max(now);
        self.stats.live = self.container.len();
        &self.respawns
    }

    /// Advances the field's clock by `by`.
    pub fn advance_by(&mut self, by: SimDuration) -> &[Respawn] {
        let target = self.now + by;
        self.advance_to(target)
    }

    fn fire(&mut self, slot: SlotHandle) {
        if self.detached {
            self.stats.orphaned_fires += 1;
            tracing::trace!(slot = slot.index(), at = %self.now, "orphaned respawn timer");
            return;
        }

        let Some(expired) = self.container.free(slot) else {
            self.stats.orphaned_fires += 1;
            tracing::trace!(slot = slot.index(), at = %self.now, "stale respawn timer");
            return;
        };
        self.stats.expired_total += 1;

        let generation = expired.generation().saturating_add(1);
        match self.spawn_generation(generation) {
            Ok(replacement) => {
                tracing::trace!(
                    expired = %expired.id(),
                    %replacement,
                    generation,
                    at = %self.now,
                    "particle respawned"
                );
                self.respawns.push(Respawn {
                    expired: expired.id(),
                    replacement,
                    at: self.now,
                });
            }
            // The slot was freed just above, so this only happens if the
            // field was detached in between
            Err(error) => {
                tracing::warn!(%error, expired = %expired.id(), "replacement not spawned");
            }
        }
    }

    fn discard_pending(&mut self) {
        let discarded = self.timers.clear();
        let removed = self.container.len();
        self.container.clear();
        if discarded > 0 || removed > 0 {
            tracing::info!(discarded, removed, at = %self.now, "particle field cancelled");
        }
        self.stats.discarded_timers += discarded as u64;
        self.stats.live = 0;
        self.detached = true;
    }

    /// Removes the container from its page.
    ///
    /// Particles are dropped; pending timers are left to fire as no-ops.
    pub fn teardown(&mut self) {
        let removed = self.container.len();
        self.container.clear();
        self.detached = true;
        self.stats.live = 0;
        tracing::info!(
            removed,
            pending = self.timers.len(),
            at = %self.now,
            "particle field detached"
        );
    }

    /// Cancels the field. Takes effect on the next dispatch.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A handle that cancels this field from anywhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Current simulated instant.
    #[must_use]
    pub fn now(&self) -> SimInstant {
        self.now
    }

    /// The configuration the field was built with.
    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Configured population.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.config.target_count
    }

    /// Number of particles in the container.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.container.len()
    }

    /// Number of timers still queued, orphaned ones included.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Instant of the next timer.
    #[must_use]
    pub fn next_expiry(&self) -> Option<SimInstant> {
        self.timers.next_due()
    }

    /// Returns true after teardown or cancellation.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Live particles in slot order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.container.values()
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Instance records for every live particle, in slot order.
    #[must_use]
    pub fn instance_data(&self) -> Vec<ParticleInstance> {
        self.particles().map(ParticleInstance::from_particle).collect()
    }

    /// Instance records as bytes for upload.
    #[must_use]
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instance_data()).to_vec()
    }
}
