//! Structure-of-arrays storage for the simulated bodies.
//!
//! A [`ParticleField`] holds `count` positions, velocities and radii in
//! parallel contiguous arrays. The arrays never change length; changing the
//! body count means building a new field.
//!
//! Index 0 is the *control body*. While [`ParticleField::control_enabled`] is
//! set it is driven toward [`ParticleField::control_center`] instead of being
//! integrated; otherwise it behaves like every other body.
//!
//! # Renderer access
//!
//! Positions are stored as `glam::Vec3`, which is `Pod`, so a renderer can
//! upload them directly:
//!
//! ```ignore
//! let flat: &[f32] = field.position_data(); // 3 * count floats
//! let instances = field.instances();        // [BodyInstance] with radius
//! queue.write_buffer(&buffer, 0, bytemuck::cast_slice(&instances));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::SimConfig;
use crate::spawn::SpawnContext;

/// Per-body record handed to an instanced renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 3],
    pub radius: f32,
}

/// Positions, velocities and radii of every body, plus the control target.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    radii: Vec<f32>,
    /// Whether body 0 follows `control_center`.
    pub control_enabled: bool,
    /// Target point for the control body.
    pub control_center: Vec3,
}

impl ParticleField {
    /// Seed a new field from `config`, using `config.seed` if set.
    pub fn new(config: &SimConfig) -> Self {
        let mut ctx = SpawnContext::from_optional_seed(config.seed);
        Self::with_spawner(config, &mut ctx)
    }

    /// Seed a new field drawing randomness from `ctx`.
    ///
    /// Body 0 starts at the origin with radius `size0`. The rest are spread
    /// uniformly through the world box with radii in `[min_size, max_size]`.
    /// Every body starts at rest.
    pub fn with_spawner(config: &SimConfig, ctx: &mut SpawnContext) -> Self {
        let count = config.count;
        let half = Vec3::new(config.max_x, config.max_y, config.max_z);

        let mut positions = Vec::with_capacity(count);
        let mut radii = Vec::with_capacity(count);
        for i in 0..count {
            if i == 0 {
                positions.push(Vec3::ZERO);
                radii.push(config.size0);
            } else {
                positions.push(ctx.random_in_box(half));
                radii.push(ctx.random_range(config.min_size, config.max_size));
            }
        }

        Self {
            positions,
            velocities: vec![Vec3::ZERO; count],
            radii,
            control_enabled: false,
            control_center: Vec3::ZERO,
        }
    }

    /// Build a field from explicit bodies, all at rest.
    ///
    /// # Panics
    ///
    /// Panics if `positions` and `radii` differ in length.
    pub fn from_bodies(positions: Vec<Vec3>, radii: Vec<f32>) -> Self {
        assert_eq!(
            positions.len(),
            radii.len(),
            "positions and radii must describe the same bodies"
        );
        let count = positions.len();
        Self {
            positions,
            velocities: vec![Vec3::ZERO; count],
            radii,
            control_enabled: false,
            control_center: Vec3::ZERO,
        }
    }

    /// Number of bodies.
    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// True when the field holds no bodies.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// First index that is freely integrated this tick.
    #[inline]
    pub fn first_free_index(&self) -> usize {
        if self.control_enabled {
            1
        } else {
            0
        }
    }

    #[inline]
    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    #[inline]
    pub fn velocity(&self, index: usize) -> Vec3 {
        self.velocities[index]
    }

    #[inline]
    pub fn radius(&self, index: usize) -> f32 {
        self.radii[index]
    }

    #[inline]
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        self.positions[index] = position;
    }

    #[inline]
    pub fn set_velocity(&mut self, index: usize, velocity: Vec3) {
        self.velocities[index] = velocity;
    }

    #[inline]
    pub fn set_radius(&mut self, index: usize, radius: f32) {
        self.radii[index] = radius;
    }

    /// All positions.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All velocities.
    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// All radii.
    #[inline]
    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    /// Positions flattened to `3 * count` floats.
    pub fn position_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Positions and radii packed for instanced drawing.
    pub fn instances(&self) -> Vec<BodyInstance> {
        self.positions
            .iter()
            .zip(&self.radii)
            .map(|(p, &radius)| BodyInstance {
                position: p.to_array(),
                radius,
            })
            .collect()
    }

    /// Mutable access to all three arrays at once, for the physics passes.
    #[inline]
    pub(crate) fn arrays_mut(&mut self) -> (&mut [Vec3], &mut [Vec3], &[f32]) {
        (&mut self.positions, &mut self.velocities, &self.radii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize) -> SimConfig {
        SimConfig::default().with_count(count).with_seed(3)
    }

    #[test]
    fn test_control_body_starts_at_origin() {
        let field = ParticleField::new(&config(50));
        assert_eq!(field.count(), 50);
        assert_eq!(field.position(0), Vec3::ZERO);
        assert_eq!(field.radius(0), config(50).size0);
        assert!(!field.control_enabled);
    }

    #[test]
    fn test_bodies_inside_world_box_with_valid_radii() {
        let cfg = config(300);
        let field = ParticleField::new(&cfg);
        for i in 1..field.count() {
            let p = field.position(i);
            assert!(p.x.abs() <= cfg.max_x);
            assert!(p.y.abs() <= cfg.max_y);
            assert!(p.z.abs() <= cfg.max_z);
            let r = field.radius(i);
            assert!(r >= cfg.min_size && r <= cfg.max_size);
            assert_eq!(field.velocity(i), Vec3::ZERO);
        }
    }

    #[test]
    fn test_arrays_stay_parallel() {
        let field = ParticleField::new(&config(17));
        assert_eq!(field.positions().len(), 17);
        assert_eq!(field.velocities().len(), 17);
        assert_eq!(field.radii().len(), 17);
        assert_eq!(field.position_data().len(), 17 * 3);
    }

    #[test]
    fn test_empty_field() {
        let field = ParticleField::new(&config(0));
        assert!(field.is_empty());
        assert!(field.instances().is_empty());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = ParticleField::new(&config(20));
        let b = ParticleField::new(&config(20));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.radii(), b.radii());
    }

    #[test]
    fn test_instances_pack_position_and_radius() {
        let field = ParticleField::from_bodies(
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.5)],
            vec![0.5, 0.75],
        );
        let instances = field.instances();
        assert_eq!(instances[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(instances[1].radius, 0.75);

        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 2 * 16);
    }

    #[test]
    fn test_first_free_index_follows_control() {
        let mut field = ParticleField::from_bodies(vec![Vec3::ZERO; 3], vec![1.0; 3]);
        assert_eq!(field.first_free_index(), 0);
        field.control_enabled = true;
        assert_eq!(field.first_free_index(), 1);
    }
}
