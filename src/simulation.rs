//! Simulation facade.
//!
//! [`Simulation`] owns one [`ParticleField`] together with the parameters,
//! camera and lifecycle that drive it. Hosts feed it frame callbacks,
//! pointer events (through a [`PointerRouter`](crate::input::PointerRouter)
//! and [`ControlBinding`]), resizes and visibility changes; renderers read
//! positions and radii back out.
//!
//! ```ignore
//! let mut sim = Simulation::headless(SimConfig::default().with_seed(7))?;
//! sim.set_visible(true, Instant::now());
//!
//! loop {
//!     if let Some(tick) = sim.frame(Instant::now()) {
//!         draw(sim.instances());
//!     }
//! }
//! ```

use std::time::Instant;

use glam::Vec2;

use crate::camera::Camera;
use crate::config::{CameraConfig, SimConfig, ViewportSize};
use crate::control::ControlBinding;
use crate::error::ConfigError;
use crate::field::{BodyInstance, ParticleField};
use crate::lifecycle::{
    fit_bounds_to_viewport, FrameScheduler, FrameTick, LifecycleManager, LoopState,
    ManualScheduler,
};
use crate::physics;
use crate::spawn::SpawnContext;

/// A running ballpit: bodies, parameters, camera and update loop.
pub struct Simulation {
    config: SimConfig,
    camera: Camera,
    field: ParticleField,
    lifecycle: LifecycleManager<Box<dyn FrameScheduler>>,
    viewport: Option<ViewportSize>,
}

impl Simulation {
    /// Create a simulation with the default camera.
    ///
    /// The config is validated and the field spawned immediately. The loop
    /// stays stopped until the host reports the surface visible.
    pub fn new(
        config: SimConfig,
        scheduler: impl FrameScheduler + 'static,
    ) -> Result<Self, ConfigError> {
        Self::with_camera(config, &CameraConfig::default(), scheduler)
    }

    /// Create a simulation with an explicit camera.
    pub fn with_camera(
        config: SimConfig,
        camera: &CameraConfig,
        scheduler: impl FrameScheduler + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = spawn_field(&config);
        log::info!("Spawned {} bodies", field.count());

        let scheduler: Box<dyn FrameScheduler> = Box::new(scheduler);
        Ok(Self {
            config,
            camera: Camera::new(camera),
            field,
            lifecycle: LifecycleManager::new(scheduler),
            viewport: None,
        })
    }

    /// Create a simulation whose frames are delivered by polling
    /// [`frame`](Self::frame).
    pub fn headless(config: SimConfig) -> Result<Self, ConfigError> {
        Self::new(config, ManualScheduler::new())
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn lifecycle(&self) -> &LifecycleManager<Box<dyn FrameScheduler>> {
        &self.lifecycle
    }

    /// The last applied viewport, if any.
    #[inline]
    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport
    }

    /// Per-body render data.
    pub fn instances(&self) -> Vec<BodyInstance> {
        self.field.instances()
    }

    /// Replace the parameters without respawning.
    ///
    /// Bounds are refit to the current viewport if one has been applied. A
    /// changed `count` only takes effect on [`reseed`](Self::reseed).
    /// Turning `follow_cursor` off releases the control body.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.count != self.field.count() {
            log::warn!(
                "Body count changed from {} to {}; call reseed to respawn",
                self.field.count(),
                config.count
            );
        }
        if !config.follow_cursor {
            self.field.control_enabled = false;
        }
        self.config = config;
        self.refit_bounds();
        Ok(())
    }

    /// Replace the parameters and respawn every body.
    pub fn reseed(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.refit_bounds();
        self.field = spawn_field(&self.config);
        log::info!("Reseeded field with {} bodies", self.field.count());
        Ok(())
    }

    /// Move the control target under the pointer.
    ///
    /// Ignored while `follow_cursor` is off.
    pub fn steer(&mut self, binding: &ControlBinding, ndc: Vec2) {
        if self.config.follow_cursor {
            binding.steer(&mut self.field, &self.camera, ndc);
        }
    }

    /// Return the control body to free motion.
    pub fn release(&mut self, binding: &ControlBinding) {
        binding.release(&mut self.field);
    }

    /// Handle a frame callback. Runs one physics step unless paused.
    ///
    /// Returns `None` for a stale callback, in which case nothing changed.
    pub fn frame(&mut self, now: Instant) -> Option<FrameTick> {
        let tick = self.lifecycle.on_frame(now)?;
        if tick.advance {
            physics::step(&mut self.field, &self.config, tick.delta);
        }
        Some(tick)
    }

    /// Record a raw viewport resize. Applied by [`poll_resize`](Self::poll_resize).
    pub fn resize(&mut self, size: ViewportSize, now: Instant) {
        self.lifecycle.on_resize(size, now);
    }

    /// Apply the pending resize once it has settled. Returns the applied size.
    pub fn poll_resize(&mut self, now: Instant) -> Option<ViewportSize> {
        let size = self.lifecycle.poll_resize(now)?;
        self.apply_viewport(size);
        Some(size)
    }

    /// When the pending resize settles.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.lifecycle.resize_deadline()
    }

    /// Apply a viewport immediately: camera aspect and world bounds.
    pub fn apply_viewport(&mut self, size: ViewportSize) {
        self.viewport = Some(size);
        fit_bounds_to_viewport(&mut self.config, &mut self.camera, size);
    }

    pub fn set_visible(&mut self, visible: bool, now: Instant) -> LoopState {
        self.lifecycle.set_visible(visible, now)
    }

    pub fn set_foreground(&mut self, foreground: bool, now: Instant) -> LoopState {
        self.lifecycle.set_foreground(foreground, now)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.lifecycle.is_paused()
    }

    pub fn pause(&mut self) {
        self.lifecycle.pause();
    }

    pub fn resume(&mut self) {
        self.lifecycle.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.lifecycle.toggle_pause();
    }

    /// Stop the loop and release the control body.
    pub fn dispose(&mut self) {
        self.lifecycle.dispose();
        self.field.control_enabled = false;
    }

    fn refit_bounds(&mut self) {
        if let Some(size) = self.viewport {
            fit_bounds_to_viewport(&mut self.config, &mut self.camera, size);
        }
    }
}

fn spawn_field(config: &SimConfig) -> ParticleField {
    let mut ctx = SpawnContext::from_optional_seed(config.seed);
    ParticleField::with_spawner(config, &mut ctx)
}
