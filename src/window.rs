//! winit host for a [`Simulation`].
//!
//! Translates window events into router, lifecycle and resize calls:
//!
//! | Event                  | Effect                                        |
//! |------------------------|-----------------------------------------------|
//! | `CursorMoved`          | `PointerRouter::pointer_moved`                |
//! | `CursorLeft`           | `PointerRouter::pointer_left_document`        |
//! | left button pressed    | `PointerRouter::clicked` (toggles pause)      |
//! | `Resized`              | surface rects updated, viewport debounced     |
//! | `Focused`              | `Simulation::set_foreground`                  |
//! | `Occluded`             | `Simulation::set_visible`                     |
//! | `RedrawRequested`      | `Simulation::frame`                           |
//!
//! Keyboard: `Space` toggles pause, `R` reseeds, `Escape` quits.
//!
//! Nothing is drawn; a renderer would read [`Simulation::instances`] in the
//! redraw handler.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::{SimConfig, ViewportSize};
use crate::control::ControlBinding;
use crate::error::AppError;
use crate::input::{Callbacks, NoHooks, PointerRouter, Rect, SurfaceId};
use crate::lifecycle::FrameScheduler;
use crate::simulation::Simulation;

/// Surface driving the control body.
const CONTROL_SURFACE: SurfaceId = SurfaceId(0);
/// Surface receiving clicks, covering the same area.
const CLICK_SURFACE: SurfaceId = SurfaceId(1);

const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Frame requests recorded for the event loop to turn into redraws.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    wanted: Rc<Cell<bool>>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request.
    pub fn take(&self) -> bool {
        self.wanted.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        self.wanted.set(true);
    }

    fn cancel_frame(&mut self) {
        self.wanted.set(false);
    }
}

/// Viewport in logical pixels for a physical window size.
pub fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> ViewportSize {
    let logical: LogicalSize<f32> = size.to_logical(scale_factor);
    ViewportSize::new(logical.width, logical.height, scale_factor as f32)
}

/// Pointer rect covering the whole window, in physical pixels.
pub fn surface_rect(size: PhysicalSize<u32>) -> Rect {
    Rect::new(0.0, 0.0, size.width as f32, size.height as f32)
}

pub struct App {
    window: Option<Window>,
    sim: Simulation,
    router: PointerRouter<Simulation>,
    redraw: RedrawScheduler,
    last_report: Instant,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: SimConfig) -> Result<Self, AppError> {
        let redraw = RedrawScheduler::new();
        let sim = Simulation::new(config, redraw.clone())?;
        Ok(Self {
            window: None,
            sim,
            router: PointerRouter::new(NoHooks),
            redraw,
            last_report: Instant::now(),
            error: None,
        })
    }

    #[inline]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title("Ballpit")
            .with_inner_size(LogicalSize::new(1280, 720));
        let window = event_loop.create_window(attrs)?;

        let size = window.inner_size();
        let rect = surface_rect(size);
        self.router.register(CONTROL_SURFACE, rect, ControlBinding);
        self.router.register(
            CLICK_SURFACE,
            rect,
            Callbacks::new().on_click(|_, sim: &mut Simulation| sim.toggle_pause()),
        );

        self.sim.apply_viewport(viewport_for(size, window.scale_factor()));
        // New windows normally take focus; a Focused(false) follows otherwise
        let now = Instant::now();
        self.sim.set_foreground(true, now);
        self.sim.set_visible(true, now);

        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Space) => self.sim.toggle_pause(),
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                let config = self.sim.config().clone();
                if let Err(e) = self.sim.reseed(config) {
                    log::warn!("Reseed failed: {}", e);
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        if self.sim.frame(now).is_none() {
            return;
        }
        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            self.last_report = now;
            let field = self.sim.field();
            log::info!(
                "fps: {:.1}, control: {} at {:?}{}",
                self.sim.lifecycle().clock().fps(),
                if field.control_enabled { "on" } else { "off" },
                field.positions().first(),
                if self.sim.is_paused() { " (paused)" } else { "" }
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.sim.set_visible(true, Instant::now());
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.sim.set_visible(false, Instant::now());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.sim.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let rect = surface_rect(size);
                self.router.update_rect(CONTROL_SURFACE, rect);
                self.router.update_rect(CLICK_SURFACE, rect);
                if let Some(window) = &self.window {
                    self.sim
                        .resize(viewport_for(size, window.scale_factor()), Instant::now());
                }
            }
            WindowEvent::Focused(focused) => {
                self.sim.set_foreground(focused, Instant::now());
            }
            WindowEvent::Occluded(occluded) => {
                self.sim.set_visible(!occluded, Instant::now());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                self.router.pointer_moved(cursor, &mut self.sim);
            }
            WindowEvent::CursorLeft { .. } => {
                self.router.pointer_left_document(&mut self.sim);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let cursor = self.router.cursor();
                self.router.clicked(cursor, &mut self.sim);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if let Some(size) = self.sim.poll_resize(now) {
            log::debug!("Applied viewport {}x{}", size.width, size.height);
        }

        if self.redraw.take() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        match self.sim.resize_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

/// Open a window and run `config` until it is closed.
pub fn run(config: SimConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_scheduler_shares_requests() {
        let scheduler = RedrawScheduler::new();
        let mut handle = scheduler.clone();

        handle.request_frame();
        assert!(scheduler.take());
        assert!(!scheduler.take());

        handle.request_frame();
        handle.cancel_frame();
        assert!(!scheduler.take());
    }

    #[test]
    fn test_viewport_for_scales_to_logical() {
        let size = viewport_for(PhysicalSize::new(2560, 1440), 2.0);
        assert_eq!(size.width, 1280.0);
        assert_eq!(size.height, 720.0);
        assert_eq!(size.pixel_ratio, 2.0);
        assert!((size.aspect() - 16.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_surface_rect_covers_window() {
        let rect = surface_rect(PhysicalSize::new(800, 600));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(800.0, 600.0)));
        assert!(!rect.contains(Vec2::new(801.0, 10.0)));
    }

    #[test]
    fn test_app_routes_pointer_into_simulation() {
        let mut app = App::new(SimConfig::default().with_count(5).with_seed(1)).unwrap();
        app.router
            .register(CONTROL_SURFACE, surface_rect(PhysicalSize::new(200, 100)), ControlBinding);
        app.router.register(
            CLICK_SURFACE,
            surface_rect(PhysicalSize::new(200, 100)),
            Callbacks::new().on_click(|_, sim: &mut Simulation| sim.toggle_pause()),
        );

        app.router.pointer_moved(Vec2::new(100.0, 50.0), &mut app.sim);
        assert!(app.sim.field().control_enabled);
        assert!(app.sim.field().control_center.length() < 1e-4);

        app.router.clicked(Vec2::new(100.0, 50.0), &mut app.sim);
        assert!(app.sim.is_paused());

        app.router.pointer_left_document(&mut app.sim);
        assert!(!app.sim.field().control_enabled);
    }

    #[test]
    fn test_status_report_with_empty_field() {
        let mut app = App::new(SimConfig::default().with_count(0)).unwrap();
        let now = Instant::now();
        app.sim.set_visible(true, now);
        app.last_report = now - REPORT_INTERVAL * 2;

        app.redraw();
        assert!(app.last_report > now - REPORT_INTERVAL);
        assert!(app.sim.field().is_empty());
    }
}
