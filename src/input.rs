//! Pointer routing for any number of tracked surfaces.
//!
//! A single global pointer stream is shared by every surface registered with
//! a [`PointerRouter`]. On each event the router recomputes the cursor once,
//! then tests it against each surface's current bounding rectangle and fires
//! that surface's listener:
//!
//! | Transition          | Calls                    |
//! |---------------------|--------------------------|
//! | outside → inside    | `on_enter`, then `on_move` |
//! | inside → inside     | `on_move`                |
//! | inside → outside    | `on_leave`               |
//! | click while inside  | `on_click`               |
//!
//! Listeners receive a caller-supplied context `&mut C`, so they can update
//! application state (a [`Simulation`](crate::Simulation), a log, ...)
//! without shared ownership.
//!
//! # Usage
//!
//! ```ignore
//! let mut router: PointerRouter<Simulation> = PointerRouter::new(NoHooks);
//! router.register(SurfaceId(0), Rect::new(0.0, 0.0, 800.0, 600.0), ControlBinding);
//!
//! // In the host event handler:
//! router.pointer_moved(Vec2::new(x, y), &mut simulation);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;

/// Identity of a tracked surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Axis-aligned rectangle in screen pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Map a screen point into `[-1, 1]²`, Y up, origin at the center.
    ///
    /// An empty rectangle maps everything to the center.
    pub fn normalize(&self, point: Vec2) -> Vec2 {
        let local = point - self.top_left();
        let nx = if self.width > 0.0 {
            2.0 * (local.x / self.width) - 1.0
        } else {
            0.0
        };
        let ny = if self.height > 0.0 {
            -2.0 * (local.y / self.height) + 1.0
        } else {
            0.0
        };
        Vec2::new(nx, ny)
    }
}

/// Pointer state of one tracked surface, as seen by its listener.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Cursor position in screen pixels.
    pub position: Vec2,
    /// Cursor position relative to the surface's top-left corner.
    pub local: Vec2,
    /// Cursor position in `[-1, 1]²` relative to the surface, Y up.
    pub normalized: Vec2,
    /// Whether the cursor is currently over the surface.
    pub hover: bool,
}

/// Receives routed pointer events for one surface.
///
/// Every method defaults to doing nothing.
pub trait PointerListener<C> {
    fn on_enter(&mut self, _pointer: &PointerState, _ctx: &mut C) {}
    fn on_move(&mut self, _pointer: &PointerState, _ctx: &mut C) {}
    fn on_leave(&mut self, _pointer: &PointerState, _ctx: &mut C) {}
    fn on_click(&mut self, _pointer: &PointerState, _ctx: &mut C) {}
}

type Callback<C> = Box<dyn FnMut(&PointerState, &mut C)>;

/// Closure-based [`PointerListener`].
///
/// ```ignore
/// let callbacks = Callbacks::new()
///     .on_enter(|_, log: &mut Vec<&str>| log.push("enter"))
///     .on_leave(|_, log| log.push("leave"));
/// ```
pub struct Callbacks<C> {
    enter: Option<Callback<C>>,
    moved: Option<Callback<C>>,
    leave: Option<Callback<C>>,
    click: Option<Callback<C>>,
}

impl<C> Callbacks<C> {
    pub fn new() -> Self {
        Self {
            enter: None,
            moved: None,
            leave: None,
            click: None,
        }
    }

    pub fn on_enter(mut self, f: impl FnMut(&PointerState, &mut C) + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_move(mut self, f: impl FnMut(&PointerState, &mut C) + 'static) -> Self {
        self.moved = Some(Box::new(f));
        self
    }

    pub fn on_leave(mut self, f: impl FnMut(&PointerState, &mut C) + 'static) -> Self {
        self.leave = Some(Box::new(f));
        self
    }

    pub fn on_click(mut self, f: impl FnMut(&PointerState, &mut C) + 'static) -> Self {
        self.click = Some(Box::new(f));
        self
    }
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PointerListener<C> for Callbacks<C> {
    fn on_enter(&mut self, pointer: &PointerState, ctx: &mut C) {
        if let Some(f) = &mut self.enter {
            f(pointer, ctx);
        }
    }

    fn on_move(&mut self, pointer: &PointerState, ctx: &mut C) {
        if let Some(f) = &mut self.moved {
            f(pointer, ctx);
        }
    }

    fn on_leave(&mut self, pointer: &PointerState, ctx: &mut C) {
        if let Some(f) = &mut self.leave {
            f(pointer, ctx);
        }
    }

    fn on_click(&mut self, pointer: &PointerState, ctx: &mut C) {
        if let Some(f) = &mut self.click {
            f(pointer, ctx);
        }
    }
}

/// Installs and removes the host's global pointer listeners.
///
/// The router calls [`attach`](InputHooks::attach) when its first surface is
/// registered and [`detach`](InputHooks::detach) when the last one is
/// disposed.
pub trait InputHooks {
    fn attach(&mut self);
    fn detach(&mut self);
}

/// Hooks for hosts that always deliver pointer events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl InputHooks for NoHooks {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}

struct PointerTracker<C> {
    rect: Rect,
    state: PointerState,
    listener: Box<dyn PointerListener<C>>,
}

impl<C> PointerTracker<C> {
    fn update(&mut self, cursor: Vec2) {
        self.state.position = cursor;
        self.state.local = cursor - self.rect.top_left();
        self.state.normalized = self.rect.normalize(cursor);
    }
}

/// Routes a global pointer stream to registered surfaces.
pub struct PointerRouter<C> {
    trackers: BTreeMap<SurfaceId, PointerTracker<C>>,
    hooks: Box<dyn InputHooks>,
    attached: bool,
    cursor: Vec2,
}

impl<C> PointerRouter<C> {
    /// Create an empty router. No hooks are attached until a surface registers.
    pub fn new(hooks: impl InputHooks + 'static) -> Self {
        Self {
            trackers: BTreeMap::new(),
            hooks: Box::new(hooks),
            attached: false,
            cursor: Vec2::ZERO,
        }
    }

    /// Start tracking `surface`. Re-registering replaces its listener and rect.
    pub fn register(
        &mut self,
        surface: SurfaceId,
        rect: Rect,
        listener: impl PointerListener<C> + 'static,
    ) {
        self.trackers.insert(
            surface,
            PointerTracker {
                rect,
                state: PointerState::default(),
                listener: Box::new(listener),
            },
        );
        if !self.attached {
            self.hooks.attach();
            self.attached = true;
            log::debug!("Pointer hooks attached");
        }
    }

    /// Stop tracking `surface`. Returns `false` if it was not registered.
    ///
    /// Disposing the last surface detaches the global hooks.
    pub fn dispose(&mut self, surface: SurfaceId) -> bool {
        let removed = self.trackers.remove(&surface).is_some();
        if removed && self.trackers.is_empty() && self.attached {
            self.hooks.detach();
            self.attached = false;
            log::debug!("Pointer hooks detached");
        }
        removed
    }

    /// Replace the bounding rectangle of `surface` (after layout or resize).
    pub fn update_rect(&mut self, surface: SurfaceId, rect: Rect) -> bool {
        match self.trackers.get_mut(&surface) {
            Some(tracker) => {
                tracker.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Current pointer state of `surface`.
    pub fn pointer(&self, surface: SurfaceId) -> Option<&PointerState> {
        self.trackers.get(&surface).map(|t| &t.state)
    }

    /// Current bounding rectangle of `surface`.
    pub fn rect(&self, surface: SurfaceId) -> Option<Rect> {
        self.trackers.get(&surface).map(|t| t.rect)
    }

    /// Last global cursor position.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Number of tracked surfaces.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Whether the global hooks are currently installed.
    pub fn hooks_attached(&self) -> bool {
        self.attached
    }

    /// Handle a raw pointer move at screen position `cursor`.
    pub fn pointer_moved(&mut self, cursor: Vec2, ctx: &mut C) {
        self.cursor = cursor;
        for tracker in self.trackers.values_mut() {
            tracker.update(cursor);
            let inside = tracker.rect.contains(cursor);
            match (tracker.state.hover, inside) {
                (false, true) => {
                    tracker.state.hover = true;
                    tracker.listener.on_enter(&tracker.state, ctx);
                    tracker.listener.on_move(&tracker.state, ctx);
                }
                (true, true) => tracker.listener.on_move(&tracker.state, ctx),
                (true, false) => {
                    tracker.state.hover = false;
                    tracker.listener.on_leave(&tracker.state, ctx);
                }
                (false, false) => {}
            }
        }
    }

    /// Handle the pointer leaving the host document or window entirely.
    pub fn pointer_left_document(&mut self, ctx: &mut C) {
        for tracker in self.trackers.values_mut() {
            if tracker.state.hover {
                tracker.state.hover = false;
                tracker.listener.on_leave(&tracker.state, ctx);
            }
        }
    }

    /// Handle a click at screen position `cursor`.
    ///
    /// Fires `on_click` for every surface containing the cursor; hover state
    /// is left untouched.
    pub fn clicked(&mut self, cursor: Vec2, ctx: &mut C) {
        self.cursor = cursor;
        for tracker in self.trackers.values_mut() {
            tracker.update(cursor);
            if tracker.rect.contains(cursor) {
                tracker.listener.on_click(&tracker.state, ctx);
            }
        }
    }
}

impl<C> Drop for PointerRouter<C> {
    fn drop(&mut self) {
        if self.attached {
            self.hooks.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    type Log = Vec<(u64, &'static str)>;

    fn logging(id: u64) -> Callbacks<Log> {
        Callbacks::new()
            .on_enter(move |_, log: &mut Log| log.push((id, "enter")))
            .on_move(move |_, log: &mut Log| log.push((id, "move")))
            .on_leave(move |_, log: &mut Log| log.push((id, "leave")))
            .on_click(move |_, log: &mut Log| log.push((id, "click")))
    }

    struct CountingHooks {
        attached: Rc<Cell<i32>>,
    }

    impl InputHooks for CountingHooks {
        fn attach(&mut self) {
            self.attached.set(self.attached.get() + 1);
        }
        fn detach(&mut self) {
            self.attached.set(self.attached.get() - 1);
        }
    }

    #[test]
    fn test_enter_move_leave_sequence() {
        let mut router = PointerRouter::new(NoHooks);
        router.register(SurfaceId(1), Rect::new(0.0, 0.0, 100.0, 100.0), logging(1));
        let mut log = Log::new();

        router.pointer_moved(Vec2::new(50.0, 50.0), &mut log);
        assert_eq!(log, vec![(1, "enter"), (1, "move")]);

        log.clear();
        router.pointer_moved(Vec2::new(60.0, 60.0), &mut log);
        assert_eq!(log, vec![(1, "move")]);

        log.clear();
        router.pointer_moved(Vec2::new(150.0, 50.0), &mut log);
        router.pointer_moved(Vec2::new(160.0, 50.0), &mut log);
        router.pointer_moved(Vec2::new(170.0, 40.0), &mut log);
        assert_eq!(log, vec![(1, "leave")]);

        log.clear();
        router.pointer_moved(Vec2::new(10.0, 10.0), &mut log);
        assert_eq!(log, vec![(1, "enter"), (1, "move")]);
    }

    #[test]
    fn test_normalized_coordinates() {
        let mut router = PointerRouter::new(NoHooks);
        let id = SurfaceId(7);
        router.register(id, Rect::new(10.0, 20.0, 200.0, 100.0), Callbacks::new());
        let mut ctx = ();

        router.pointer_moved(Vec2::new(110.0, 70.0), &mut ctx);
        let state = router.pointer(id).unwrap();
        assert_eq!(state.local, Vec2::new(100.0, 50.0));
        assert!(state.normalized.length() < 1e-6);
        assert!(state.hover);

        router.pointer_moved(Vec2::new(10.0, 20.0), &mut ctx);
        assert_eq!(router.pointer(id).unwrap().normalized, Vec2::new(-1.0, 1.0));

        router.pointer_moved(Vec2::new(210.0, 120.0), &mut ctx);
        assert_eq!(router.pointer(id).unwrap().normalized, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_hooks_reference_counted() {
        let counter = Rc::new(Cell::new(0));
        let mut router: PointerRouter<()> = PointerRouter::new(CountingHooks {
            attached: counter.clone(),
        });
        assert_eq!(counter.get(), 0);

        router.register(SurfaceId(1), Rect::default(), Callbacks::new());
        router.register(SurfaceId(2), Rect::default(), Callbacks::new());
        assert_eq!(counter.get(), 1);
        assert!(router.hooks_attached());

        assert!(router.dispose(SurfaceId(1)));
        assert_eq!(counter.get(), 1);
        assert!(!router.dispose(SurfaceId(1)));

        assert!(router.dispose(SurfaceId(2)));
        assert_eq!(counter.get(), 0);
        assert!(!router.hooks_attached());

        router.register(SurfaceId(3), Rect::default(), Callbacks::new());
        assert_eq!(counter.get(), 1);
        drop(router);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_click_only_inside() {
        let mut router = PointerRouter::new(NoHooks);
        router.register(SurfaceId(1), Rect::new(0.0, 0.0, 100.0, 100.0), logging(1));
        router.register(SurfaceId(2), Rect::new(200.0, 0.0, 100.0, 100.0), logging(2));
        let mut log = Log::new();

        // Click without a prior move still fires, hover is unchanged
        router.clicked(Vec2::new(250.0, 50.0), &mut log);
        assert_eq!(log, vec![(2, "click")]);
        assert!(!router.pointer(SurfaceId(2)).unwrap().hover);
    }

    #[test]
    fn test_overlapping_surfaces_share_stream() {
        let mut router = PointerRouter::new(NoHooks);
        router.register(SurfaceId(1), Rect::new(0.0, 0.0, 100.0, 100.0), logging(1));
        router.register(SurfaceId(2), Rect::new(50.0, 50.0, 100.0, 100.0), logging(2));
        let mut log = Log::new();

        router.pointer_moved(Vec2::new(75.0, 75.0), &mut log);
        assert_eq!(log, vec![(1, "enter"), (1, "move"), (2, "enter"), (2, "move")]);

        log.clear();
        router.pointer_moved(Vec2::new(25.0, 25.0), &mut log);
        assert_eq!(log, vec![(1, "move"), (2, "leave")]);
    }

    #[test]
    fn test_document_leave_fires_for_hovered_only() {
        let mut router = PointerRouter::new(NoHooks);
        router.register(SurfaceId(1), Rect::new(0.0, 0.0, 100.0, 100.0), logging(1));
        router.register(SurfaceId(2), Rect::new(200.0, 0.0, 100.0, 100.0), logging(2));
        let mut log = Log::new();

        router.pointer_moved(Vec2::new(50.0, 50.0), &mut log);
        log.clear();
        router.pointer_left_document(&mut log);
        router.pointer_left_document(&mut log);
        assert_eq!(log, vec![(1, "leave")]);
    }

    #[test]
    fn test_update_rect_changes_containment() {
        let mut router = PointerRouter::new(NoHooks);
        let id = SurfaceId(1);
        router.register(id, Rect::new(0.0, 0.0, 10.0, 10.0), logging(1));
        let mut log = Log::new();

        router.pointer_moved(Vec2::new(50.0, 50.0), &mut log);
        assert!(log.is_empty());

        assert!(router.update_rect(id, Rect::new(0.0, 0.0, 100.0, 100.0)));
        router.pointer_moved(Vec2::new(50.0, 50.0), &mut log);
        assert_eq!(log, vec![(1, "enter"), (1, "move")]);
        assert!(!router.update_rect(SurfaceId(9), Rect::default()));
    }

    #[test]
    fn test_empty_rect_normalizes_to_center() {
        let rect = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(rect.normalize(Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }
}
