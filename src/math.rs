//! Vector helpers shared by the physics step and the pointer mapping.
//!
//! Everything here is built on `glam::Vec3`. Most of the vector algebra
//! (add, subtract, length, lerp) is glam's own; this module adds the few
//! operations whose degenerate cases the simulation has to pin down, plus
//! a minimal ray/plane pair used to project the cursor into the scene.

use glam::Vec3;

/// Linear interpolation from `from` toward `to` by `t`.
#[inline]
pub fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(to, t)
}

/// Clamp the length of `v` to at most `max`, keeping its direction.
///
/// A non-positive `max` collapses the vector to zero.
#[inline]
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    if max <= 0.0 {
        return Vec3::ZERO;
    }
    v.clamp_length_max(max)
}

/// Unit vector from `from` to `to` together with the distance between them.
///
/// Returns `None` when the points coincide, since no direction exists.
#[inline]
pub fn direction_and_distance(from: Vec3, to: Vec3) -> Option<(Vec3, f32)> {
    let delta = to - from;
    let distance = delta.length();
    if distance > 0.0 && distance.is_finite() {
        Some((delta / distance, distance))
    } else {
        None
    }
}

/// A half-line starting at `origin` heading along a unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. The direction is normalized; a zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// An infinite plane `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

/// Below this, a ray is treated as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

impl Plane {
    /// Plane with the given normal passing through `point`.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            constant: -normal.dot(point),
        }
    }

    /// Signed distance from `point` to the plane.
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Intersection of the full line through `ray` with this plane.
    ///
    /// Intersections behind the ray origin are still reported, so a camera
    /// placed past the plane keeps tracking the cursor. Returns `None` only
    /// when the ray is parallel to the plane (or the plane is degenerate).
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.distance_to(ray.origin) / denom;
        t.is_finite().then(|| ray.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_length_keeps_direction() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let clamped = clamp_length(v, 1.0);
        assert!((clamped.length() - 1.0).abs() < 1e-6);
        assert!((clamped.x - 0.6).abs() < 1e-6);
        assert!((clamped.y - 0.8).abs() < 1e-6);

        // Short vectors are untouched
        let short = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(clamp_length(short, 1.0), short);
    }

    #[test]
    fn test_clamp_length_non_positive_max() {
        assert_eq!(clamp_length(Vec3::ONE, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_direction_and_distance() {
        let (dir, dist) = direction_and_distance(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(dir, Vec3::Y);
        assert_eq!(dist, 2.0);

        assert!(direction_and_distance(Vec3::ONE, Vec3::ONE).is_none());
    }

    #[test]
    fn test_ray_plane_intersection() {
        let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::ZERO);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 10.0), -Vec3::Z);
        let hit = plane.intersect(&ray).unwrap();
        assert!((hit - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_parallel_to_plane() {
        let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(plane.intersect(&ray).is_none());
    }

    #[test]
    fn test_lerp_tenth() {
        let p = lerp(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.1);
        assert!((p.x - 1.0).abs() < 1e-6);
    }
}
