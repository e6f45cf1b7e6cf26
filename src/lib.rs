//! # Ballpit
//!
//! A box of bouncing spheres with one body that follows the pointer.
//!
//! The crate contains the whole simulation side of the effect: body storage,
//! the per-tick physics, pointer routing over any number of surfaces, the
//! pointer-to-world mapping for the control body, and a lifecycle that only
//! runs the loop while the surface is visible and the host is in the
//! foreground. Rendering is left to the host, which reads positions and radii
//! after each frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ballpit::prelude::*;
//! use std::time::Instant;
//!
//! let config = SimConfig::default().with_count(100).with_seed(42);
//! let mut sim = Simulation::headless(config)?;
//! sim.set_visible(true, Instant::now());
//!
//! while let Some(_tick) = sim.frame(Instant::now()) {
//!     for body in sim.instances() {
//!         // draw a sphere at body.position with body.radius
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Bodies
//!
//! A [`ParticleField`] stores positions, velocities and radii as parallel
//! arrays. Body 0 is the control body: while control is enabled it eases
//! toward [`ParticleField::control_center`] and shoves other bodies out of
//! its way instead of being integrated.
//!
//! ### Physics
//!
//! [`physics::step`] runs one tick in a fixed order: control easing,
//! integration (gravity, friction, speed cap), pairwise collisions, control
//! collisions, boundaries. Under gravity only the floor is enforced on Y.
//!
//! ### Pointer input
//!
//! A [`PointerRouter`] turns one global pointer stream into enter, move,
//! leave and click callbacks per registered surface. [`ControlBinding`]
//! listens on a surface and steers the control body onto the plane through
//! the origin facing the camera.
//!
//! ### Lifecycle
//!
//! [`LifecycleManager`] runs frames only while visible and in the
//! foreground, rejects stale frame callbacks after a stop, keeps timing
//! while paused, and debounces resizes before refitting the world bounds.
//!
//! ## Configuration
//!
//! [`SimConfig`] can be built with `with_*` setters or loaded from JSON:
//!
//! ```ignore
//! let config = SimConfig::from_json_str(r#"{ "count": 50, "gravity": 0.0 }"#)?;
//! ```

pub mod camera;
pub mod config;
pub mod control;
pub mod error;
pub mod field;
pub mod input;
pub mod lifecycle;
pub mod math;
pub mod physics;
pub mod simulation;
pub mod spawn;
pub mod time;
pub mod window;

pub use bytemuck;
pub use glam::{Mat4, Vec2, Vec3};

pub use camera::Camera;
pub use config::{CameraConfig, SimConfig, ViewportSize};
pub use control::ControlBinding;
pub use error::{AppError, ConfigError};
pub use field::{BodyInstance, ParticleField};
pub use input::{
    Callbacks, InputHooks, NoHooks, PointerListener, PointerRouter, PointerState, Rect, SurfaceId,
};
pub use lifecycle::{FrameScheduler, FrameTick, LifecycleManager, LoopState, ManualScheduler};
pub use simulation::Simulation;
pub use spawn::SpawnContext;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ballpit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{CameraConfig, SimConfig, ViewportSize};
    pub use crate::control::ControlBinding;
    pub use crate::field::{BodyInstance, ParticleField};
    pub use crate::input::{Callbacks, PointerListener, PointerRouter, Rect, SurfaceId};
    pub use crate::lifecycle::{FrameScheduler, LoopState};
    pub use crate::simulation::Simulation;
    pub use crate::{Vec2, Vec3};
}
