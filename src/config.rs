//! Simulation configuration.
//!
//! [`SimConfig`] is created once per run. Replacing it wholesale through
//! [`Simulation::reseed`](crate::Simulation::reseed) rebuilds the particle
//! field; only the world bounds (`max_x`, `max_y`) are rewritten in place
//! when the viewport is resized.
//!
//! # Example
//!
//! ```ignore
//! let config = SimConfig::default()
//!     .with_count(120)
//!     .with_gravity(0.0)
//!     .with_size_range(0.4, 0.9);
//! config.validate()?;
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physical parameters of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of bodies, including the control body at index 0.
    pub count: usize,
    /// Downward acceleration, scaled per body by its radius.
    pub gravity: f32,
    /// Velocity retained per tick (1.0 = no damping).
    pub friction: f32,
    /// Fraction of velocity kept (sign-flipped) when hitting a wall.
    pub wall_bounce: f32,
    /// Speed cap applied during integration.
    pub max_velocity: f32,
    /// Half-width of the world box.
    pub max_x: f32,
    /// Half-height of the world box.
    pub max_y: f32,
    /// Half-depth of the world box.
    pub max_z: f32,
    /// Smallest radius of an ordinary body.
    pub min_size: f32,
    /// Largest radius of an ordinary body.
    pub max_size: f32,
    /// Radius of the control body.
    pub size0: f32,
    /// Whether pointer movement drives the control body.
    pub follow_cursor: bool,
    /// Seed for the spawn RNG; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            count: 200,
            gravity: 0.5,
            friction: 0.9975,
            wall_bounce: 0.95,
            max_velocity: 0.15,
            max_x: 5.0,
            max_y: 5.0,
            max_z: 2.0,
            min_size: 0.5,
            max_size: 1.0,
            size0: 1.0,
            follow_cursor: true,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Set the number of bodies.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set gravity. Zero turns the Y axis into a closed box.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set per-tick velocity retention.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the wall bounce coefficient.
    pub fn with_wall_bounce(mut self, wall_bounce: f32) -> Self {
        self.wall_bounce = wall_bounce;
        self
    }

    /// Set the speed cap.
    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set the half-extents of the world box.
    pub fn with_bounds(mut self, max_x: f32, max_y: f32, max_z: f32) -> Self {
        self.max_x = max_x;
        self.max_y = max_y;
        self.max_z = max_z;
        self
    }

    /// Set the radius range of ordinary bodies.
    pub fn with_size_range(mut self, min_size: f32, max_size: f32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the control body radius.
    pub fn with_size0(mut self, size0: f32) -> Self {
        self.size0 = size0;
        self
    }

    /// Enable or disable pointer following.
    pub fn with_follow_cursor(mut self, follow: bool) -> Self {
        self.follow_cursor = follow;
        self
    }

    /// Fix the spawn seed for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Half-depth used for Z wall collisions.
    ///
    /// Widened to `max_size` so a body is never clipped by its own radius.
    #[inline]
    pub fn z_bound(&self) -> f32 {
        self.max_z.max(self.max_size)
    }

    /// Check every parameter against its allowed range.
    ///
    /// The physics step assumes a config that passes this check; it never
    /// validates on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("wall_bounce", self.wall_bounce),
            ("max_velocity", self.max_velocity),
            ("max_x", self.max_x),
            ("max_y", self.max_y),
            ("max_z", self.max_z),
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("size0", self.size0),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite"));
            }
        }

        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::invalid("friction", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.wall_bounce) {
            return Err(ConfigError::invalid("wall_bounce", "must be within [0, 1]"));
        }
        if self.max_velocity < 0.0 {
            return Err(ConfigError::invalid("max_velocity", "must not be negative"));
        }
        if self.max_x <= 0.0 {
            return Err(ConfigError::invalid("max_x", "must be positive"));
        }
        if self.max_y <= 0.0 {
            return Err(ConfigError::invalid("max_y", "must be positive"));
        }
        if self.max_z <= 0.0 {
            return Err(ConfigError::invalid("max_z", "must be positive"));
        }
        if self.min_size <= 0.0 {
            return Err(ConfigError::invalid("min_size", "must be positive"));
        }
        if self.max_size < self.min_size {
            return Err(ConfigError::invalid("max_size", "must be at least min_size"));
        }
        if self.size0 <= 0.0 {
            return Err(ConfigError::invalid("size0", "must be positive"));
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Perspective camera placement used to map the viewport into world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera position; the camera always looks at the origin.
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 15.0,
            position: Vec3::new(0.0, 0.0, 20.0),
        }
    }
}

/// Size of the rendering surface in CSS-style logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio after clamping.
    pub pixel_ratio: f32,
}

/// Range the device pixel ratio is clamped into.
pub const MIN_PIXEL_RATIO: f32 = 1.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

impl ViewportSize {
    /// Create a viewport size, clamping the pixel ratio into
    /// [`MIN_PIXEL_RATIO`, `MAX_PIXEL_RATIO`].
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: pixel_ratio.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO),
        }
    }

    /// Width over height, or 1.0 for an empty viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels.
    pub fn physical(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }
}
