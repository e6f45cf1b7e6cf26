//! Perspective camera looking at the origin.
//!
//! The camera is only used for two things on the CPU side: turning a
//! normalized pointer position into a world-space ray, and working out how
//! much of the world is visible at the origin so the simulation bounds can
//! match the viewport.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;
use crate::math::Ray;

/// Perspective camera aimed at the world origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width over height of the viewport.
    pub aspect: f32,
    /// World-space camera position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl Camera {
    /// Create a camera from its configuration with a square aspect.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect: 1.0,
            position: config.position,
            target: Vec3::ZERO,
        }
    }

    /// Update the aspect ratio after a resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Distance from the camera to the origin.
    pub fn distance(&self) -> f32 {
        self.position.length()
    }

    /// Size of the visible rectangle, `(width, height)`, on the plane through
    /// the origin facing the camera.
    pub fn visible_extent(&self) -> (f32, f32) {
        let half_fov = self.fov_degrees.to_radians() * 0.5;
        let height = 2.0 * half_fov.tan() * self.distance();
        (height * self.aspect, height)
    }

    /// Ray from the camera through a normalized pointer position.
    ///
    /// `ndc` is in `[-1, 1]` on both axes with Y pointing up.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let forward = self.forward();
        let mut right = forward.cross(Vec3::Y);
        if right.length_squared() < 1e-12 {
            // Looking straight up or down
            right = forward.cross(Vec3::Z);
        }
        let right = right.normalize();
        let up = right.cross(forward);

        let tan_half_fov = (self.fov_degrees.to_radians() * 0.5).tan();
        let direction = forward
            + right * (ndc.x * self.aspect * tan_half_fov)
            + up * (ndc.y * tan_half_fov);
        Ray::new(self.position, direction)
    }

    /// View matrix for a renderer.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection matrix for a renderer.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, 0.1, 1000.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_origin() {
        let camera = Camera::default();
        let ray = camera.ray_through(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn test_visible_extent_matches_fov() {
        let mut camera = Camera::new(&CameraConfig {
            fov_degrees: 90.0,
            position: Vec3::new(0.0, 0.0, 10.0),
        });
        camera.set_aspect(2.0);
        let (w, h) = camera.visible_extent();
        assert!((h - 20.0).abs() < 1e-3);
        assert!((w - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_corner_ray_lands_on_visible_corner() {
        let mut camera = Camera::default();
        camera.set_aspect(1.5);
        let (w, h) = camera.visible_extent();

        let ray = camera.ray_through(Vec2::new(1.0, 1.0));
        // Plane z = 0 sits at camera distance along -Z
        let t = camera.position.z / -ray.direction.z;
        let hit = ray.at(t);
        assert!((hit.x - w * 0.5).abs() < 1e-3);
        assert!((hit.y - h * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_aspect_ignored() {
        let mut camera = Camera::default();
        camera.set_aspect(0.0);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 1.0);
    }
}
