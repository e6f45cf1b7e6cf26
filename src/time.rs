//! Frame timing for the update loop.
//!
//! [`FrameClock`] measures the time between successive frame callbacks.
//! Deltas are clamped to [`FrameClock::max_delta`] so a frame arriving after
//! a long stall (a window restored after being hidden, a debugger pause)
//! cannot move bodies far enough to skip through a wall.
//!
//! Every method that reads the clock also has an `_at` variant taking an
//! explicit `Instant`, which is what the lifecycle and the tests use.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per frame:
//! let delta = clock.tick();
//! println!("Delta: {:.4}s, FPS: {:.1}", delta, clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single frame delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Timing state of the frame loop.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the clock was last reset.
    start: Instant,
    /// When the previous frame was measured.
    last_frame: Instant,
    /// Seconds since reset, summing clamped deltas.
    elapsed_secs: f32,
    /// Clamped time since the previous frame.
    delta_secs: f32,
    /// Upper bound for `delta_secs`.
    max_delta: f32,
    /// Frames since reset.
    frame_count: u64,
    /// Frames per second, refreshed every `fps_update_interval`.
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock starting at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            max_delta: DEFAULT_MAX_DELTA,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Measure a frame now. Returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Measure a frame at `now`. Returns the clamped delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = raw.min(self.max_delta);
        self.last_frame = now;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Restart measurement at `now` so the next delta ignores the idle gap.
    ///
    /// Elapsed time and frame count are kept.
    pub fn resume_at(&mut self, now: Instant) {
        self.last_frame = now;
        self.delta_secs = 0.0;
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
    }

    /// Reset everything to a fresh clock starting at `now`.
    pub fn reset_at(&mut self, now: Instant) {
        let max_delta = self.max_delta;
        *self = Self::starting_at(now);
        self.max_delta = max_delta;
    }

    /// Set the upper bound for a single delta. Negative values clamp to 0.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Seconds accumulated from clamped deltas.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Last clamped delta in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames measured since reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// When the clock was last reset.
    #[inline]
    pub fn start_instant(&self) -> Instant {
        self.start
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
