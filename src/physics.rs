//! Per-tick update of a [`ParticleField`].
//!
//! A tick runs five passes in a fixed order. Each pass visits every body
//! before the next pass starts:
//!
//! 1. [`ease_control_body`] - body 0 glides toward the pointer target
//! 2. [`integrate`] - gravity, friction, speed cap, then `position += velocity`
//! 3. [`resolve_collisions`] - pairwise sphere separation
//! 4. [`resolve_control_collisions`] - ordinary bodies ejected from body 0
//! 5. [`apply_boundaries`] - clamp and reflect against the world box
//!
//! Gravity is scaled by radius, so larger bodies fall faster. Integration
//! adds the raw velocity each tick; only gravity is weighted by the delta.
//!
//! Collision pairs are visited in ascending `(i, j)` order and every
//! correction is written back immediately, so later pairs in the same tick
//! see already-separated positions. Iteration order changes the exact
//! trajectory; residual overlap left by one tick is cleaned up by the next.

use glam::Vec3;

use crate::config::SimConfig;
use crate::field::ParticleField;
use crate::math::{clamp_length, direction_and_distance, lerp};

/// Fraction of the remaining distance the control body covers per tick.
pub const CONTROL_EASING: f32 = 0.1;
/// Share of the overlap each body of a colliding pair is moved by.
pub const PAIR_CORRECTION_SHARE: f32 = 0.5;
/// Minimum speed factor for the pair velocity impulse.
pub const PAIR_IMPULSE_FLOOR: f32 = 1.0;
/// Share of the overlap an ordinary body is moved by when hit by body 0.
pub const CONTROL_CORRECTION_SHARE: f32 = 1.0;
/// Minimum speed factor for the control-body velocity impulse.
pub const CONTROL_IMPULSE_FLOOR: f32 = 2.0;

/// Advance the field by one tick of `delta_time` seconds.
///
/// The caller is responsible for keeping `delta_time` small; see
/// [`FrameClock::set_max_delta`](crate::time::FrameClock::set_max_delta).
pub fn step(field: &mut ParticleField, config: &SimConfig, delta_time: f32) {
    if field.is_empty() {
        return;
    }
    ease_control_body(field);
    integrate(field, config, delta_time);
    resolve_collisions(field);
    resolve_control_collisions(field);
    apply_boundaries(field, config);
}

/// Move body 0 10% of the way to `control_center` and hold it at rest.
pub fn ease_control_body(field: &mut ParticleField) {
    if !field.control_enabled || field.is_empty() {
        return;
    }
    let target = field.control_center;
    let (positions, velocities, _) = field.arrays_mut();
    positions[0] = lerp(positions[0], target, CONTROL_EASING);
    velocities[0] = Vec3::ZERO;
}

/// Apply gravity, friction and the speed cap, then move every free body.
pub fn integrate(field: &mut ParticleField, config: &SimConfig, delta_time: f32) {
    let start = field.first_free_index();
    let (positions, velocities, radii) = field.arrays_mut();

    for i in start..positions.len() {
        let mut v = velocities[i];
        v.y -= delta_time * config.gravity * radii[i];
        v *= config.friction;
        v = clamp_length(v, config.max_velocity);
        velocities[i] = v;
        positions[i] += v;
    }
}

/// Push overlapping pairs of free bodies apart, half the overlap each.
///
/// The positional push is also applied to velocity, scaled by the body's
/// speed with a floor of [`PAIR_IMPULSE_FLOOR`] so resting bodies separate.
/// Bodies sharing the exact same point have no separating direction and are
/// left alone.
pub fn resolve_collisions(field: &mut ParticleField) {
    let start = field.first_free_index();
    let (positions, velocities, radii) = field.arrays_mut();
    let count = positions.len();

    for i in start..count {
        for j in (i + 1)..count {
            let Some((normal, distance)) = direction_and_distance(positions[i], positions[j]) else {
                continue;
            };
            let reach = radii[i] + radii[j];
            if distance >= reach {
                continue;
            }

            let push = normal * (PAIR_CORRECTION_SHARE * (reach - distance));
            positions[i] -= push;
            positions[j] += push;

            let factor_i = velocities[i].length().max(PAIR_IMPULSE_FLOOR);
            velocities[i] -= push * factor_i;
            let factor_j = velocities[j].length().max(PAIR_IMPULSE_FLOOR);
            velocities[j] += push * factor_j;
        }
    }
}

/// Eject ordinary bodies that overlap the control body.
///
/// Only the ordinary body moves, by the full overlap. Body 0 is kinematic.
pub fn resolve_control_collisions(field: &mut ParticleField) {
    if !field.control_enabled || field.is_empty() {
        return;
    }
    let (positions, velocities, radii) = field.arrays_mut();
    let center = positions[0];
    let control_radius = radii[0];

    for i in 1..positions.len() {
        let Some((normal, distance)) = direction_and_distance(center, positions[i]) else {
            continue;
        };
        let reach = control_radius + radii[i];
        if distance >= reach {
            continue;
        }

        let correction = normal * (CONTROL_CORRECTION_SHARE * (reach - distance));
        positions[i] += correction;
        let factor = velocities[i].length().max(CONTROL_IMPULSE_FLOOR);
        velocities[i] += correction * factor;
    }
}

/// Keep free bodies inside the world box, reflecting velocity off walls.
///
/// With gravity on, only the floor is enforced on Y. Z uses
/// [`SimConfig::z_bound`].
pub fn apply_boundaries(field: &mut ParticleField, config: &SimConfig) {
    let start = field.first_free_index();
    let bounce = config.wall_bounce;
    let z_bound = config.z_bound();
    let (positions, velocities, radii) = field.arrays_mut();

    for i in start..positions.len() {
        let r = radii[i];
        let p = &mut positions[i];
        let v = &mut velocities[i];

        if p.x.abs() + r > config.max_x {
            p.x = p.x.signum() * (config.max_x - r);
            v.x = -v.x * bounce;
        }

        if config.gravity == 0.0 {
            if p.y.abs() + r > config.max_y {
                p.y = p.y.signum() * (config.max_y - r);
                v.y = -v.y * bounce;
            }
        } else if p.y - r < -config.max_y {
            p.y = -(config.max_y - r);
            v.y = -v.y * bounce;
        }

        if p.z.abs() + r > z_bound {
            p.z = p.z.signum() * (z_bound - r);
            v.z = -v.z * bounce;
        }
    }
}
