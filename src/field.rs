// Particle field simulation, independent of the canvas that draws it.
//
// Positions live in normalized viewport space `[0, 1)²` and wrap at the
// edges, so the field can be resized and redrawn at any resolution.

use crate::constants::*;
use glam::Vec2;
use rand::Rng;
use stage_core::ParticlePattern;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Per-particle wander, added on top of the pattern's flow.
    pub vel: Vec2,
    pub radius_px: f32,
    /// Phase offset for twinkle and pulse.
    pub phase: f32,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()),
            vel: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
                * PARTICLE_BASE_SPEED
                * 0.5,
            radius_px: rng.gen_range(PARTICLE_MIN_RADIUS_PX..PARTICLE_MAX_RADIUS_PX),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }
}

#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    time: f32,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Grow by spawning fresh particles or shrink by dropping the newest.
    pub fn resize_to<R: Rng>(&mut self, count: usize, rng: &mut R) {
        if count < self.particles.len() {
            self.particles.truncate(count);
        } else {
            let missing = count - self.particles.len();
            self.particles
                .extend((0..missing).map(|_| Particle::random(rng)));
        }
    }

    /// Move every particle by `dt_sec` along `pattern`'s flow. `speed` scales
    /// the whole field; zero (or a non-positive dt) leaves it untouched.
    pub fn advance(&mut self, pattern: ParticlePattern, dt_sec: f32, speed: f32) {
        let dt = dt_sec.clamp(0.0, PARTICLE_MAX_DT_SEC) * speed.max(0.0);
        if dt <= 0.0 {
            return;
        }
        self.time += dt;
        let t = self.time;
        for p in &mut self.particles {
            p.pos = wrap(p.pos + flow(pattern, p, t) * dt);
        }
    }
}

/// Velocity of `p` under `pattern` at field time `t`.
pub fn flow(pattern: ParticlePattern, p: &Particle, t: f32) -> Vec2 {
    let center = Vec2::splat(0.5);
    let offset = p.pos - center;
    match pattern {
        ParticlePattern::Drift => p.vel + Vec2::new(0.0, -PARTICLE_BASE_SPEED),
        ParticlePattern::Rain => Vec2::new(p.vel.x * 0.2, PARTICLE_RAIN_SPEED),
        ParticlePattern::Orbit => offset.perp() * PARTICLE_ORBIT_RATE,
        ParticlePattern::Constellation => p.vel * 0.3,
        ParticlePattern::Pulse => {
            offset.normalize_or_zero() * PARTICLE_BASE_SPEED * (t * 2.0 + p.phase).sin()
        }
        ParticlePattern::Spiral => {
            offset.perp() * PARTICLE_ORBIT_RATE - offset.normalize_or_zero() * PARTICLE_SPIRAL_PULL
        }
        ParticlePattern::Grid => Vec2::new(PARTICLE_BASE_SPEED, 0.0),
        ParticlePattern::Sparkle => p.vel * 0.5,
    }
}

/// Opacity in `[0, 1]` for `p` at field time `t`.
pub fn alpha(pattern: ParticlePattern, p: &Particle, t: f32) -> f32 {
    let a = match pattern {
        ParticlePattern::Sparkle => 0.5 + 0.5 * (t * 4.0 + p.phase).sin(),
        ParticlePattern::Pulse => 0.6 + 0.4 * (t * 2.0 + p.phase).sin(),
        ParticlePattern::Constellation => 0.9,
        _ => 0.75,
    };
    a.clamp(0.0, 1.0)
}

#[inline]
fn wrap(pos: Vec2) -> Vec2 {
    let w = |v: f32| {
        let r = v.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negatives
        if r >= 1.0 {
            0.0
        } else {
            r
        }
    };
    Vec2::new(w(pos.x), w(pos.y))
}
