/*
 * Steering Rules Module
 *
 * The four flocking rules, each a pure kernel that reads the frozen
 * snapshot of the flock and returns one desired acceleration for a single
 * boid:
 * 1. Cohesion: steer towards the centroid of neighbours in perception range
 * 2. Alignment: steer along the summed velocity of neighbours in perception range
 * 3. Separation: steer away from neighbours in separation range
 * 4. Collision avoidance: when the probe sphere touches an obstacle, steer
 *    along the first clear ray of the sphere ray set
 *
 * Every kernel scans every other boid (O(n) per boid, O(n²) per tick).
 */

use glam::{Quat, Vec3};

use crate::boid::Boid;
use crate::math::{distance, distance_squared, normalize_safe, steer_toward, EPSILON};
use crate::params::FlockSettings;
use crate::probe::{ObstacleQuery, SphereRaySet};

// Identifies a steering rule and its output buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Cohesion,
    Alignment,
    Separation,
    CollisionAvoidance,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::Cohesion,
        Rule::Alignment,
        Rule::Separation,
        Rule::CollisionAvoidance,
    ];

    pub fn weight(self, settings: &FlockSettings) -> f32 {
        match self {
            Rule::Cohesion => settings.cohesion_weight,
            Rule::Alignment => settings.alignment_weight,
            Rule::Separation => settings.separation_weight,
            Rule::CollisionAvoidance => settings.collision_weight,
        }
    }
}

/// Frozen copy of the flock taken at the start of a tick.
///
/// Stored as parallel arrays so each kernel streams only the fields it
/// reads. Index `i` in every array is boid `i` of the tick's slice.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub rotations: Vec<Quat>,
}

impl Snapshot {
    pub fn from_boids(boids: &[Boid]) -> Self {
        let mut snapshot = Self::default();
        snapshot.capture(boids);
        snapshot
    }

    // Overwrite the snapshot with the current state, reusing allocations
    pub fn capture(&mut self, boids: &[Boid]) {
        self.positions.clear();
        self.velocities.clear();
        self.rotations.clear();

        self.positions.extend(boids.iter().map(|b| b.position));
        self.velocities.extend(boids.iter().map(|b| b.velocity));
        self.rotations.extend(boids.iter().map(|b| b.rotation));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// Steer towards the average position of neighbours in perception range.
// With no neighbour there is no centroid, so the rule contributes nothing.
pub fn cohesion(snapshot: &Snapshot, settings: &FlockSettings, index: usize) -> Vec3 {
    let position = snapshot.positions[index];
    let range_squared = settings.perception_range_squared();

    let mut center = Vec3::ZERO;
    let mut count = 0usize;

    for (i, &other) in snapshot.positions.iter().enumerate() {
        if i != index && distance_squared(other, position) <= range_squared {
            center += other;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }

    center /= count as f32;
    steer_toward(snapshot.velocities[index], center - position, settings.max_speed)
}

// Steer along the summed (not averaged) velocity of neighbours in perception range
pub fn alignment(snapshot: &Snapshot, settings: &FlockSettings, index: usize) -> Vec3 {
    let position = snapshot.positions[index];
    let range_squared = settings.perception_range_squared();

    let mut flock_velocity = Vec3::ZERO;

    for (i, &other) in snapshot.positions.iter().enumerate() {
        if i != index && distance_squared(other, position) <= range_squared {
            flock_velocity += snapshot.velocities[i];
        }
    }

    steer_toward(snapshot.velocities[index], flock_velocity, settings.max_speed)
}

// Steer away from neighbours in separation range, each adding (self - other) / distance.
// Coincident neighbours give no direction and are skipped.
pub fn separation(snapshot: &Snapshot, settings: &FlockSettings, index: usize) -> Vec3 {
    let position = snapshot.positions[index];

    let mut push = Vec3::ZERO;

    for (i, &other) in snapshot.positions.iter().enumerate() {
        if i == index {
            continue;
        }

        let d = distance(other, position);
        if d <= settings.separation_range && d > EPSILON {
            push += (position - other) / d;
        }
    }

    steer_toward(snapshot.velocities[index], push, settings.max_speed)
}

/// Outcome of the obstacle probe for one boid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Avoidance {
    /// The broad probe found nothing nearby.
    Clear,
    /// Obstacle nearby; steering along the first clear ray (world space).
    Steer(Vec3),
    /// Obstacle nearby and every ray is blocked.
    Blocked,
}

// Run the broad probe, then walk the ray set in order and keep the first clear ray
pub fn probe_avoidance<Q>(
    snapshot: &Snapshot,
    settings: &FlockSettings,
    rays: &SphereRaySet,
    world: &Q,
    index: usize,
) -> Avoidance
where
    Q: ObstacleQuery + ?Sized,
{
    let position = snapshot.positions[index];
    let range = settings.collision_range;

    if !world.probe(position, range) {
        return Avoidance::Clear;
    }

    let rotation = snapshot.rotations[index];
    rays.iter()
        .map(|&ray| rotation * normalize_safe(ray))
        .find(|&direction| !world.cast_ray(position, position + direction * range))
        .map_or(Avoidance::Blocked, Avoidance::Steer)
}

/// Desired acceleration away from nearby obstacles.
///
/// Zero when nothing is near, and also zero when no ray is clear: the boid
/// accepts the collision risk for this tick rather than stalling.
pub fn collision_avoidance<Q>(
    snapshot: &Snapshot,
    settings: &FlockSettings,
    rays: &SphereRaySet,
    world: &Q,
    index: usize,
) -> Vec3
where
    Q: ObstacleQuery + ?Sized,
{
    match probe_avoidance(snapshot, settings, rays, world, index) {
        Avoidance::Steer(direction) => {
            steer_toward(snapshot.velocities[index], direction, settings.max_speed)
        }
        Avoidance::Clear | Avoidance::Blocked => Vec3::ZERO,
    }
}
