//! # Steady-State Integration Tests
//!
//! Proves the field keeps its population forever, on a simulated clock.
//!
//! Run with: cargo test --package backdrop_field --test steady_state_test

use backdrop_core::{Clock, ManualClock, SimDuration, SimInstant};
use backdrop_field::{field_rng, FieldConfig, ParticleField, ParticleId};
use std::collections::HashSet;

fn field(target_count: usize, seed: u64) -> ParticleField {
    ParticleField::from_config(
        FieldConfig::default()
            .with_target_count(target_count)
            .with_seed(seed),
    )
    .expect("default ranges are valid")
}

/// Test: 50 children exist right after initialization, before time moves.
#[test]
fn test_default_field_starts_full() {
    let field = ParticleField::from_config(FieldConfig::default()).unwrap();

    assert_eq!(field.target_count(), 50);
    assert_eq!(field.live_count(), 50);
    assert_eq!(field.particles().count(), 50);
    assert_eq!(field.now(), SimInstant::ZERO);
}

/// Test: sampled at many instants, the count is always the target.
#[test]
fn test_count_constant_at_every_sample() {
    let mut field = field(50, 42);
    let mut clock = ManualClock::new();

    // 10 minutes in 250 ms frames
    for _ in 0..2_400 {
        clock.advance(SimDuration::from_millis(250));
        field.advance_to(clock.now());
        assert_eq!(field.live_count(), 50);
        assert_eq!(field.pending_timers(), 50);
    }

    assert!(field.stats().expired_total > 50);
}

/// Test: every particle ever spawned had attributes inside the ranges.
#[test]
fn test_attribute_ranges_hold_across_generations() {
    let mut field = field(50, 7);
    let config = field.config().clone();

    for _ in 0..200 {
        field.advance_by(SimDuration::from_secs(3));
        for particle in field.particles() {
            let a = particle.attributes();
            assert!((2.0..8.0).contains(&a.size), "size {}", a.size);
            assert!((0.0..100.0).contains(&a.left), "left {}", a.left);
            assert!((0.0..20.0).contains(&a.delay), "delay {}", a.delay);
            assert!((15.0..25.0).contains(&a.duration), "duration {}", a.duration);
            assert!(a.within(&config));
        }
    }
}

/// Test: each expiry yields exactly one replacement in the same step.
#[test]
fn test_each_expiry_replaced_once() {
    let mut field = field(20, 99);
    let mut seen_expired: HashSet<ParticleId> = HashSet::new();

    for _ in 0..400 {
        let before: HashSet<ParticleId> = field.particles().map(|p| p.id()).collect();
        let respawns = field.advance_by(SimDuration::from_secs(1)).to_vec();
        let after: HashSet<ParticleId> = field.particles().map(|p| p.id()).collect();

        for respawn in &respawns {
            assert!(seen_expired.insert(respawn.expired));
            assert!(!after.contains(&respawn.expired));
        }

        // Whatever left the container was replaced, one for one
        let gone = before.difference(&after).count();
        let arrived = after.difference(&before).count();
        assert_eq!(gone, arrived);
        assert_eq!(after.len(), 20);
    }
}

/// Test: the chain never terminates, even far in the future.
#[test]
fn test_field_alive_far_in_future() {
    let mut field = field(50, 2024);

    // One simulated day, jumped in large steps
    for hour in 1..=24u64 {
        field.advance_to(SimInstant::ZERO + SimDuration::from_secs(hour * 3_600));
        assert_eq!(field.live_count(), 50);
    }

    let stats = field.stats();
    assert_eq!(stats.spawned_total, 50 + stats.expired_total);
    // 86 400 s / 45 s upper lifetime bound
    assert!(stats.max_generation >= 1_920);
}

/// Test: after the longest possible lifetime every original is gone.
#[test]
fn test_three_particles_fully_replaced_within_max_lifetime() {
    let mut field = field(3, 5);
    let originals: HashSet<ParticleId> = field.particles().map(|p| p.id()).collect();
    assert_eq!(originals.len(), 3);

    // 20 s + 25 s minus one microsecond
    field.advance_by(SimDuration::from_micros(45_000_000 - 1));

    assert_eq!(field.live_count(), 3);
    for particle in field.particles() {
        assert!(!originals.contains(&particle.id()));
        assert!(particle.generation() >= 1);
    }
}

/// Test: the same seed reproduces the same field.
#[test]
fn test_same_seed_same_field() {
    let config = FieldConfig::default().with_target_count(10);
    let mut a = ParticleField::initialize(config.clone(), field_rng(Some(31))).unwrap();
    let mut b = ParticleField::initialize(config, field_rng(Some(31))).unwrap();

    let horizon = SimInstant::ZERO + SimDuration::from_secs(600);
    assert_eq!(a.advance_to(horizon).len(), b.advance_to(horizon).len());

    let a: Vec<_> = a.particles().cloned().collect();
    let b: Vec<_> = b.particles().cloned().collect();
    assert_eq!(a, b);
}
