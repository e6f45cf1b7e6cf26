//! Mapping pointer movement onto the control body.
//!
//! The pointer's normalized position is cast as a ray from the camera and
//! intersected with the plane through the origin facing the camera. The hit
//! point becomes the control body's target.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::field::ParticleField;
use crate::input::{PointerListener, PointerState};
use crate::math::Plane;
use crate::simulation::Simulation;

/// Drives body 0 of a [`ParticleField`] from routed pointer events.
///
/// Register it with a [`PointerRouter<Simulation>`](crate::input::PointerRouter)
/// for the surface the simulation is drawn on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlBinding;

impl ControlBinding {
    /// World point under the pointer on the plane through the origin.
    ///
    /// The plane normal is the camera's current forward direction, so the
    /// plane follows the camera if it moves. Returns `None` when the ray is
    /// parallel to the plane.
    pub fn target_for(camera: &Camera, ndc: Vec2) -> Option<Vec3> {
        let ray = camera.ray_through(ndc);
        let plane = Plane::from_normal_and_point(camera.forward(), Vec3::ZERO);
        plane.intersect(&ray)
    }

    /// Point the control body at the pointer and enable it.
    ///
    /// If there is no intersection the previous target is kept.
    pub fn steer(&self, field: &mut ParticleField, camera: &Camera, ndc: Vec2) {
        if let Some(target) = Self::target_for(camera, ndc) {
            field.control_center = target;
        }
        field.control_enabled = true;
    }

    /// Hand body 0 back to free integration.
    pub fn release(&self, field: &mut ParticleField) {
        field.control_enabled = false;
    }
}

impl PointerListener<Simulation> for ControlBinding {
    fn on_move(&mut self, pointer: &PointerState, sim: &mut Simulation) {
        sim.steer(self, pointer.normalized);
    }

    fn on_leave(&mut self, _pointer: &PointerState, sim: &mut Simulation) {
        sim.release(self);
    }
}
