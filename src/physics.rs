/*
 * Physics Module
 *
 * This module combines the four rule outputs into one acceleration per boid
 * and integrates it:
 * 1. velocity += acceleration * dt
 * 2. speed is clamped into [min_speed, max_speed], keeping the direction
 * 3. position += velocity * dt
 * 4. rotation faces the new direction of travel
 *
 * Only the magnitude is clamped, so a single tick may change the speed by
 * up to |acceleration| * dt before it is pulled back into range.
 */

use glam::Vec3;
use rayon::prelude::*;

use crate::boid::Boid;
use crate::math::{clamp_magnitude, look_rotation, normalize_safe, EPSILON, WORLD_UP};
use crate::params::FlockSettings;
use crate::rules::Rule;

// Per-tick output of the steering rules, one private buffer per rule
#[derive(Clone, Debug, Default)]
pub struct RuleBuffers {
    pub cohesion: Vec<Vec3>,
    pub alignment: Vec<Vec3>,
    pub separation: Vec<Vec3>,
    pub avoidance: Vec<Vec3>,
}

impl RuleBuffers {
    pub fn with_len(len: usize) -> Self {
        let mut buffers = Self::default();
        buffers.resize(len);
        buffers
    }

    // Size every buffer to the current flock, zeroing the contents
    pub fn resize(&mut self, len: usize) {
        for buffer in [
            &mut self.cohesion,
            &mut self.alignment,
            &mut self.separation,
            &mut self.avoidance,
        ] {
            buffer.clear();
            buffer.resize(len, Vec3::ZERO);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cohesion.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cohesion.is_empty()
    }

    pub fn get(&self, rule: Rule) -> &[Vec3] {
        match rule {
            Rule::Cohesion => &self.cohesion,
            Rule::Alignment => &self.alignment,
            Rule::Separation => &self.separation,
            Rule::CollisionAvoidance => &self.avoidance,
        }
    }

    // Weighted sum of the four rule outputs for one boid
    #[inline]
    pub fn accumulate(&self, settings: &FlockSettings, index: usize) -> Vec3 {
        Rule::ALL
            .iter()
            .fold(Vec3::ZERO, |sum, &rule| sum + self.get(rule)[index] * rule.weight(settings))
    }
}

/// Apply one acceleration to one boid over `dt`.
///
/// A boid that ends up with no speed keeps its previous heading and moves
/// on at `min_speed`, so the speed invariant holds and no NaN is produced.
/// Speeds already within range leave the velocity untouched.
pub fn integrate(boid: &mut Boid, acceleration: Vec3, settings: &FlockSettings, dt: f32) {
    let mut velocity = boid.velocity + acceleration * dt;
    let speed = velocity.length();
    if !speed.is_finite() || speed <= EPSILON {
        velocity = boid.forward() * settings.min_speed;
    }

    // In-range velocities come back bit-identical
    let velocity = clamp_magnitude(velocity, settings.min_speed, settings.max_speed);
    let mut direction = normalize_safe(velocity);
    if direction == Vec3::ZERO {
        direction = boid.forward();
    }

    boid.velocity = velocity;
    boid.position += velocity * dt;
    boid.rotation = look_rotation(direction, WORLD_UP);
}

// Integrate the whole flock from the rule buffers
pub fn integrate_flock(
    boids: &mut [Boid],
    buffers: &RuleBuffers,
    settings: &FlockSettings,
    dt: f32,
    chunk_size: Option<usize>,
) {
    debug_assert_eq!(boids.len(), buffers.len());

    match chunk_size {
        // Each boid only touches its own slot, so chunks are independent
        Some(chunk_size) => {
            boids
                .par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(chunk_idx, boid_chunk)| {
                    for (i_in_chunk, boid) in boid_chunk.iter_mut().enumerate() {
                        let i = chunk_idx * chunk_size + i_in_chunk;
                        integrate(boid, buffers.accumulate(settings, i), settings, dt);
                    }
                });
        }
        None => {
            for (i, boid) in boids.iter_mut().enumerate() {
                integrate(boid, buffers.accumulate(settings, i), settings, dt);
            }
        }
    }
}
