//! Update-loop lifecycle.
//!
//! The loop is either [`LoopState::Running`] or [`LoopState::Stopped`]. It
//! runs only while the simulated surface is visible *and* the host is in the
//! foreground; the two signals arrive independently and are combined here.
//!
//! | Signal change                 | Effect                                   |
//! |-------------------------------|------------------------------------------|
//! | both true                     | Running: clock resumed, frame requested  |
//! | either false                  | Stopped: pending frame cancelled         |
//! | `pause()` / `resume()`        | frames keep coming, physics skipped      |
//!
//! Frames are requested from the host through a [`FrameScheduler`]. A frame
//! callback that arrives after the loop stopped is ignored, so stopping
//! guarantees no further mutation of the field.
//!
//! Resize notifications are coalesced: only the last one inside a
//! [`RESIZE_QUIET_WINDOW`] is applied, and applying it refits the world
//! bounds to what the camera sees.
//!
//! # Host loop sketch
//!
//! ```ignore
//! lifecycle.set_visible(true, now);
//! lifecycle.set_foreground(true, now);
//!
//! // Frame callback from the host:
//! if let Some(tick) = lifecycle.on_frame(now) {
//!     if tick.advance {
//!         physics::step(&mut field, &config, tick.delta);
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::config::{SimConfig, ViewportSize};
use crate::time::FrameClock;

/// How long resize notifications must stay quiet before one is applied.
pub const RESIZE_QUIET_WINDOW: Duration = Duration::from_millis(100);

/// Whether the frame loop is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Host-side frame delivery.
///
/// `request_frame` asks for one frame callback; the host answers by calling
/// [`LifecycleManager::on_frame`]. `cancel_frame` withdraws an outstanding
/// request where the host supports it.
pub trait FrameScheduler {
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) {
        (**self).request_frame();
    }

    fn cancel_frame(&mut self) {
        (**self).cancel_frame();
    }
}

/// Scheduler for hosts that poll, such as headless runs and tests.
///
/// It only records whether a frame is outstanding; the host checks
/// [`ManualScheduler::take_request`] and then delivers the frame itself.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the outstanding request, if any.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total frames requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        if self.pending {
            self.pending = false;
            self.cancelled += 1;
        }
    }
}

/// Timing handed back for an accepted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Clamped seconds since the previous frame.
    pub delta: f32,
    /// Seconds accumulated while running.
    pub elapsed: f32,
    /// False while paused: timing advanced, physics must not.
    pub advance: bool,
}

/// Keeps only the latest value until a quiet window has passed.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer<T> {
    pending: Option<(T, Instant)>,
    quiet: Duration,
}

impl<T> ResizeDebouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { pending: None, quiet }
    }

    /// Record `value`, restarting the quiet window.
    pub fn notify(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    /// Take the pending value once the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(due) if now >= due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

/// Owns the Running/Stopped state, the pause flag, frame timing and resize
/// coalescing.
pub struct LifecycleManager<S> {
    state: LoopState,
    paused: bool,
    visible: bool,
    foreground: bool,
    frame_pending: bool,
    clock: FrameClock,
    scheduler: S,
    resize: ResizeDebouncer<ViewportSize>,
}

impl<S: FrameScheduler> LifecycleManager<S> {
    /// Create a stopped loop. It starts once the surface is reported visible
    /// while the host is in the foreground.
    pub fn new(scheduler: S) -> Self {
        Self {
            state: LoopState::Stopped,
            paused: false,
            visible: false,
            foreground: true,
            frame_pending: false,
            clock: FrameClock::new(),
            scheduler,
            resize: ResizeDebouncer::new(RESIZE_QUIET_WINDOW),
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Report whether the surface intersects the viewport.
    pub fn set_visible(&mut self, visible: bool, now: Instant) -> LoopState {
        self.visible = visible;
        self.reconcile(now)
    }

    /// Report whether the host is in the foreground.
    pub fn set_foreground(&mut self, foreground: bool, now: Instant) -> LoopState {
        self.foreground = foreground;
        self.reconcile(now)
    }

    /// Stop the loop for good (until signals are reported again).
    pub fn dispose(&mut self) {
        self.visible = false;
        self.enter_stopped();
    }

    /// Skip physics on subsequent frames; timing keeps running.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::debug!("Simulation paused");
        }
    }

    /// Resume physics after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::debug!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Handle a frame callback from the host.
    ///
    /// Returns `None` when the loop is stopped or no frame was requested.
    /// Otherwise measures the delta, requests the next frame and reports
    /// whether physics should advance.
    pub fn on_frame(&mut self, now: Instant) -> Option<FrameTick> {
        if self.state != LoopState::Running || !self.frame_pending {
            log::trace!("Ignoring stale frame callback");
            return None;
        }
        self.frame_pending = false;

        let delta = self.clock.tick_at(now);
        let tick = FrameTick {
            delta,
            elapsed: self.clock.elapsed(),
            advance: !self.paused,
        };

        self.request_frame();
        Some(tick)
    }

    /// Record a raw resize notification.
    pub fn on_resize(&mut self, size: ViewportSize, now: Instant) {
        self.resize.notify(size, now);
    }

    /// The coalesced size, once resize notifications have gone quiet.
    pub fn poll_resize(&mut self, now: Instant) -> Option<ViewportSize> {
        self.resize.poll(now)
    }

    /// When the pending resize becomes due.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    fn reconcile(&mut self, now: Instant) -> LoopState {
        let should_run = self.visible && self.foreground;
        match (self.state, should_run) {
            (LoopState::Stopped, true) => self.enter_running(now),
            (LoopState::Running, false) => self.enter_stopped(),
            _ => {}
        }
        self.state
    }

    fn enter_running(&mut self, now: Instant) {
        self.state = LoopState::Running;
        self.clock.resume_at(now);
        self.request_frame();
        log::info!("Update loop started");
    }

    fn enter_stopped(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        if self.frame_pending {
            self.frame_pending = false;
            self.scheduler.cancel_frame();
        }
        log::info!("Update loop stopped");
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
        self.scheduler.request_frame();
    }
}

/// Refit `config`'s X/Y bounds to the rectangle the camera sees at the
/// origin for a viewport of `size`.
pub fn fit_bounds_to_viewport(config: &mut SimConfig, camera: &mut Camera, size: ViewportSize) {
    camera.set_aspect(size.aspect());
    let (width, height) = camera.visible_extent();
    config.max_x = width * 0.5;
    config.max_y = height * 0.5;
    log::debug!(
        "Viewport {}x{} -> world bounds x: ±{:.3}, y: ±{:.3}",
        size.width,
        size.height,
        config.max_x,
        config.max_y
    );
}
