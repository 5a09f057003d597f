//! # Page Root
//!
//! The root that particle containers attach to.
//!
//! Attaching is not guarded: attaching twice puts two independent
//! containers on the page. Detaching tears a container down; its pending
//! timers stay with it and fire as no-ops on later dispatches.

use backdrop_core::SimInstant;
use rand::Rng;

use crate::config::FieldConfig;
use crate::error::FieldResult;
use crate::field::ParticleField;
use crate::render::container_html;
use crate::rng::FieldRng;

/// Identifies a container on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u32);

/// A page holding particle containers.
#[derive(Debug)]
pub struct Page<R = FieldRng> {
    containers: Vec<(ContainerId, ParticleField<R>)>,
    next_id: u32,
}

impl<R> Default for Page<R> {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            next_id: 0,
        }
    }
}

impl Page<FieldRng> {
    /// Attaches a container using the default generator.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`FieldConfig::validate`].
    pub fn attach_config(&mut self, config: FieldConfig) -> FieldResult<ContainerId> {
        let field = ParticleField::from_config(config)?;
        Ok(self.insert(field))
    }
}

impl<R: Rng> Page<R> {
    /// Creates an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container, fills it, and attaches it to the page.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`FieldConfig::validate`].
    pub fn attach(&mut self, config: FieldConfig, rng: R) -> FieldResult<ContainerId> {
        let field = ParticleField::initialize(config, rng)?;
        Ok(self.insert(field))
    }

    fn insert(&mut self, field: ParticleField<R>) -> ContainerId {
        let id = ContainerId(self.next_id);
        self.next_id += 1;
        self.containers.push((id, field));
        if self.attached_count() > 1 {
            tracing::debug!(
                containers = self.attached_count(),
                "more than one particle container attached"
            );
        }
        id
    }

    /// Tears down the container. Returns false if it is unknown or already
    /// detached.
    pub fn detach(&mut self, id: ContainerId) -> bool {
        match self.field_mut(id) {
            Some(field) if !field.is_detached() => {
                field.teardown();
                true
            }
            _ => false,
        }
    }

    /// Looks up a container.
    #[must_use]
    pub fn field(&self, id: ContainerId) -> Option<&ParticleField<R>> {
        self.containers
            .iter()
            .find(|(cid, _)| *cid == id)
            .map(|(_, field)| field)
    }

    /// Looks up a container mutably.
    pub fn field_mut(&mut self, id: ContainerId) -> Option<&mut ParticleField<R>> {
        self.containers
            .iter_mut()
            .find(|(cid, _)| *cid == id)
            .map(|(_, field)| field)
    }

    /// Dispatches every container up to `now`. Returns the total number of
    /// respawns.
    pub fn advance_to(&mut self, now: SimInstant) -> usize {
        self.containers
            .iter_mut()
            .map(|(_, field)| field.advance_to(now).len())
            .sum()
    }

    /// Number of containers still attached.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.containers
            .iter()
            .filter(|(_, field)| !field.is_detached())
            .count()
    }

    /// Number of containers ever attached, detached ones included.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Live particles across every attached container.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.containers
            .iter()
            .map(|(_, field)| field.live_count())
            .sum()
    }

    /// Every attached container in attach order.
    #[must_use]
    pub fn render_html(&self) -> String {
        self.containers
            .iter()
            .filter(|(_, field)| !field.is_detached())
            .map(|(_, field)| container_html(field))
            .collect()
    }
}
