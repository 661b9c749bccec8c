/*
 * Vector Math Module
 *
 * Small helpers on top of glam shared by every steering rule and by the
 * integrator. The important contract here is `normalize_safe`: a near-zero
 * vector normalizes to zero instead of NaN, so degenerate inputs never leak
 * into the flock state.
 */

use glam::{Mat3, Quat, Vec3};

// Magnitudes at or below this are treated as zero
pub const EPSILON: f32 = 1.0e-6;

// World up axis used when building orientations
pub const WORLD_UP: Vec3 = Vec3::Y;

// Local forward axis of an agent
pub const LOCAL_FORWARD: Vec3 = Vec3::Z;

// Normalize a vector, returning zero when its length is (near) zero
#[inline]
pub fn normalize_safe(v: Vec3) -> Vec3 {
    let length_squared = v.length_squared();
    if length_squared <= EPSILON * EPSILON || !length_squared.is_finite() {
        return Vec3::ZERO;
    }
    v / length_squared.sqrt()
}

/// Reynolds steering: desired velocity at full speed minus current velocity.
///
/// A zero `desired_direction` yields `-current_velocity`.
#[inline]
pub fn steer_toward(current_velocity: Vec3, desired_direction: Vec3, max_speed: f32) -> Vec3 {
    normalize_safe(desired_direction) * max_speed - current_velocity
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

#[inline]
pub fn distance_squared(a: Vec3, b: Vec3) -> f32 {
    a.distance_squared(b)
}

// Upper bound on single-ulp corrections after a rescale
const MAX_SCALE_NUDGES: usize = 16;

/// Clamp the length of a vector into `[min, max]`, keeping its direction.
///
/// Zero vectors stay zero since they have no direction to keep. A vector
/// already in range is returned unchanged. A rescaled vector is nudged one
/// ulp of scale at a time until its recomputed `length()` lies inside the
/// range, so clamping an already clamped vector is a no-op. When
/// `min == max` the exact length may not be representable, in which case
/// the result ends up within a few ulps of it.
pub fn clamp_magnitude(v: Vec3, min: f32, max: f32) -> Vec3 {
    let length = v.length();
    if length <= EPSILON {
        return Vec3::ZERO;
    }
    let target = length.clamp(min, max);
    if target == length {
        return v;
    }

    let mut scale = target / length;
    let mut clamped = v * scale;
    for _ in 0..MAX_SCALE_NUDGES {
        let length = clamped.length();
        if length > max && scale > 0.0 {
            scale = next_down(scale);
        } else if length < min {
            scale = next_up(scale);
        } else {
            break;
        }
        clamped = v * scale;
    }
    clamped
}

// Neighbouring floats of a positive finite value
#[inline]
fn next_up(x: f32) -> f32 {
    f32::from_bits(x.to_bits() + 1)
}

#[inline]
fn next_down(x: f32) -> f32 {
    f32::from_bits(x.to_bits() - 1)
}

/// Build a rotation whose local +Z points along `forward` and whose local +Y
/// is as close to `up` as possible.
///
/// `forward` must be normalized. When it is parallel to `up` there is no
/// unique roll, so the shortest arc from +Z is used instead.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let right = up.cross(forward);
    if right.length_squared() <= EPSILON {
        return Quat::from_rotation_arc(LOCAL_FORWARD, forward);
    }
    let right = right.normalize();
    let true_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, forward)).normalize()
}
