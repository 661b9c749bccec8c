/*
 * Spawn Module
 *
 * Places a fresh flock. The random source is passed in explicitly so a
 * seeded generator always produces the same flock.
 */

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::boid::Boid;
use crate::math::{clamp_magnitude, normalize_safe};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub count: usize,
    pub radius: f32,
    pub center: Vec3,
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 500,
            radius: 20.0,
            center: Vec3::ZERO,
            seed: 42,
        }
    }
}

// Random point inside the unit ball (rejection sampling)
fn random_in_unit_ball<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

// Random unit direction, never zero
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let dir = normalize_safe(random_in_unit_ball(rng));
        if dir != Vec3::ZERO {
            return dir;
        }
    }
}

/// Spawn `config.count` boids uniformly inside a ball, each heading in a
/// random direction at a speed drawn from `min_speed..=max_speed`.
pub fn spawn_flock<R: Rng + ?Sized>(
    config: &SpawnConfig,
    min_speed: f32,
    max_speed: f32,
    rng: &mut R,
) -> Vec<Boid> {
    (0..config.count)
        .map(|_| {
            let position = config.center + random_in_unit_ball(rng) * config.radius;
            let speed = rng.gen_range(min_speed..=max_speed);
            let velocity = clamp_magnitude(random_direction(rng) * speed, min_speed, max_speed);
            Boid::new(position, velocity)
        })
        .collect()
}
