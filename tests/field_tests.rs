// Host-side tests for the particle field simulation.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod field {
    include!("../src/field.rs");
}

use field::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stage_core::ParticlePattern;

const PATTERNS: [ParticlePattern; 8] = [
    ParticlePattern::Drift,
    ParticlePattern::Orbit,
    ParticlePattern::Constellation,
    ParticlePattern::Rain,
    ParticlePattern::Pulse,
    ParticlePattern::Spiral,
    ParticlePattern::Grid,
    ParticlePattern::Sparkle,
];

fn seeded_field(count: usize) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(7);
    let mut field = ParticleField::new();
    field.resize_to(count, &mut rng);
    field
}

#[test]
fn resize_grows_and_shrinks_keeping_oldest() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut field = ParticleField::new();
    field.resize_to(100, &mut rng);
    assert_eq!(field.len(), 100);
    let first = field.particles()[0];
    field.resize_to(20, &mut rng);
    assert_eq!(field.len(), 20);
    assert_eq!(field.particles()[0], first);
    field.resize_to(0, &mut rng);
    assert!(field.is_empty());
}

#[test]
fn positions_stay_in_unit_square_for_every_pattern() {
    for pattern in PATTERNS {
        let mut field = seeded_field(200);
        for _ in 0..600 {
            field.advance(pattern, 1.0 / 60.0, 1.0);
        }
        for p in field.particles() {
            assert!((0.0..1.0).contains(&p.pos.x), "{pattern:?} x={}", p.pos.x);
            assert!((0.0..1.0).contains(&p.pos.y), "{pattern:?} y={}", p.pos.y);
        }
    }
}

#[test]
fn zero_dt_or_speed_leaves_field_untouched() {
    let mut field = seeded_field(50);
    let before: Vec<_> = field.particles().to_vec();
    field.advance(ParticlePattern::Rain, 0.0, 1.0);
    field.advance(ParticlePattern::Rain, 1.0 / 60.0, 0.0);
    field.advance(ParticlePattern::Rain, -1.0, 1.0);
    assert_eq!(field.particles(), &before[..]);
    assert_eq!(field.time(), 0.0);
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut a = seeded_field(10);
    let mut b = seeded_field(10);
    a.advance(ParticlePattern::Grid, 5.0, 1.0);
    b.advance(ParticlePattern::Grid, 0.1, 1.0);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn rain_falls_and_drift_rises() {
    let p = seeded_field(1).particles()[0];
    assert!(flow(ParticlePattern::Rain, &p, 0.0).y > 0.0);
    let still = Particle {
        vel: glam::Vec2::ZERO,
        ..p
    };
    assert!(flow(ParticlePattern::Drift, &still, 0.0).y < 0.0);
}

#[test]
fn alpha_is_a_valid_opacity() {
    let field = seeded_field(50);
    for pattern in PATTERNS {
        for t in [0.0, 0.3, 1.7, 12.5] {
            for p in field.particles() {
                let a = alpha(pattern, p, t);
                assert!((0.0..=1.0).contains(&a), "{pattern:?} {a}");
            }
        }
    }
}
