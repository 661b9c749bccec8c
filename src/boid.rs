/*
 * Boid Module
 *
 * This module defines the Boid struct, one simulated agent in the flock.
 * A boid carries its transform (position + rotation) and its velocity.
 * The rotation is always derived from the velocity at the end of a tick,
 * so it only matters as the frame used by the obstacle probe and as the
 * heading kept when the boid comes to a stop.
 */

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::{look_rotation, normalize_safe, LOCAL_FORWARD, WORLD_UP};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
}

impl Default for Boid {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }
}

impl Boid {
    // Create a boid facing its velocity (identity rotation when at rest)
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        let heading = normalize_safe(velocity);
        let rotation = if heading == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            look_rotation(heading, WORLD_UP)
        };

        Self {
            position,
            rotation,
            velocity,
        }
    }

    // Direction the boid is facing in world space
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * LOCAL_FORWARD
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Rotate a local-space direction into world space
    #[inline]
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}
