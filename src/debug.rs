/*
 * Debug Information Module
 *
 * Per-tick metrics returned by the scheduler, plus a summary of the flock's
 * state that the runner logs at its report interval:
 * - Number of boids simulated
 * - Number of boids steering around an obstacle
 * - Time spent in the rule kernels and in integration
 */

use std::time::Duration;

use glam::Vec3;

use crate::boid::Boid;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub agent_count: usize,
    pub avoiding: usize,
    pub rules_elapsed: Duration,
    pub integrate_elapsed: Duration,
}

impl TickStats {
    // Count boids with a non-zero avoidance output this tick
    pub fn record_avoidance(&mut self, avoidance: &[Vec3]) {
        self.avoiding = avoidance.iter().filter(|a| **a != Vec3::ZERO).count();
    }

    pub fn total_elapsed(&self) -> Duration {
        self.rules_elapsed + self.integrate_elapsed
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockSummary {
    pub centroid: Vec3,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl FlockSummary {
    pub fn of(boids: &[Boid]) -> Option<Self> {
        if boids.is_empty() {
            return None;
        }

        let mut centroid = Vec3::ZERO;
        let mut total_speed = 0.0;
        let mut min_speed = f32::INFINITY;
        let mut max_speed = 0.0_f32;

        for boid in boids {
            let speed = boid.speed();
            centroid += boid.position;
            total_speed += speed;
            min_speed = min_speed.min(speed);
            max_speed = max_speed.max(speed);
        }

        let n = boids.len() as f32;
        Some(Self {
            centroid: centroid / n,
            mean_speed: total_speed / n,
            min_speed,
            max_speed,
        })
    }
}
