/*
 * Obstacle Probe Module
 *
 * Everything the collision avoidance rule needs to look at the world:
 * - SphereRaySet: a fixed set of unit directions spread evenly over the
 *   sphere with golden-angle (Fibonacci) sampling. Ray 0 points straight
 *   ahead (+Z) and the set spirals backwards from there, so walking it in
 *   order tries the directions closest to the current heading first.
 * - ObstacleQuery: the two boolean queries the host collision system has
 *   to answer. The flock core is otherwise collision-engine agnostic.
 * - NoObstacles and SphereObstacles: simple host worlds for the headless
 *   runner and for tests.
 */

use std::f32::consts::PI;
use std::ops::Index;

use glam::Vec3;
use serde::{Deserialize, Serialize};

// Number of probe directions used when none is configured
pub const DEFAULT_RAY_COUNT: usize = 300;

#[derive(Clone, Debug, PartialEq)]
pub struct SphereRaySet {
    rays: Box<[Vec3]>,
}

impl Default for SphereRaySet {
    fn default() -> Self {
        Self::fibonacci(DEFAULT_RAY_COUNT)
    }
}

impl SphereRaySet {
    // Distribute `count` directions over the unit sphere using the golden angle
    pub fn fibonacci(count: usize) -> Self {
        let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let angle_increment = PI * 2.0 * golden_ratio;

        let rays = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                let inclination = (1.0 - 2.0 * t).acos();
                let azimuth = angle_increment * i as f32;

                Vec3::new(
                    inclination.sin() * azimuth.cos(),
                    inclination.sin() * azimuth.sin(),
                    inclination.cos(),
                )
            })
            .collect();

        Self { rays }
    }

    // Build a ray set from explicit directions, normalizing each one
    pub fn from_directions<I>(directions: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let rays = directions
            .into_iter()
            .map(crate::math::normalize_safe)
            .collect();
        Self { rays }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.rays.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vec3] {
        &self.rays
    }
}

impl Index<usize> for SphereRaySet {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.rays[index]
    }
}

/// Collision queries supplied by the host physics system.
///
/// Implementations are shared by every worker thread during a tick, so they
/// must be read-only for the tick's duration.
pub trait ObstacleQuery {
    /// Does a sphere of `radius` centred at `position` touch any obstacle?
    fn probe(&self, position: Vec3, radius: f32) -> bool;

    /// Does the segment from `start` to `end` hit any obstacle?
    fn cast_ray(&self, start: Vec3, end: Vec3) -> bool;
}

impl<T: ObstacleQuery + ?Sized> ObstacleQuery for &T {
    fn probe(&self, position: Vec3, radius: f32) -> bool {
        (**self).probe(position, radius)
    }

    fn cast_ray(&self, start: Vec3, end: Vec3) -> bool {
        (**self).cast_ray(start, end)
    }
}

// Empty world: nothing is ever hit
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl ObstacleQuery for NoObstacles {
    fn probe(&self, _position: Vec3, _radius: f32) -> bool {
        false
    }

    fn cast_ray(&self, _start: Vec3, _end: Vec3) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereObstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    fn overlaps_sphere(&self, position: Vec3, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.center.distance_squared(position) <= reach * reach
    }

    fn intersects_segment(&self, start: Vec3, end: Vec3) -> bool {
        let segment = end - start;
        let length_squared = segment.length_squared();

        // Closest point on the segment to the sphere center
        let t = if length_squared > 0.0 {
            ((self.center - start).dot(segment) / length_squared).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = start + segment * t;

        closest.distance_squared(self.center) <= self.radius * self.radius
    }
}

// Static world made of spheres, brute-force tested
#[derive(Clone, Debug, Default)]
pub struct SphereObstacles {
    spheres: Vec<SphereObstacle>,
}

impl SphereObstacles {
    pub fn new(spheres: Vec<SphereObstacle>) -> Self {
        Self { spheres }
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl ObstacleQuery for SphereObstacles {
    fn probe(&self, position: Vec3, radius: f32) -> bool {
        self.spheres.iter().any(|s| s.overlaps_sphere(position, radius))
    }

    fn cast_ray(&self, start: Vec3, end: Vec3) -> bool {
        self.spheres.iter().any(|s| s.intersects_segment(start, end))
    }
}
