//! Integration tests for the simulation facade.
//!
//! These drive a headless [`Simulation`] through the public API the way a
//! host would: visibility changes, routed pointer events, frames, resizes.

use std::time::{Duration, Instant};

use ballpit::prelude::*;
use ballpit::{ConfigError, NoHooks};

const FRAME: Duration = Duration::from_micros(16_667);

fn running_sim(config: SimConfig, start: Instant) -> Simulation {
    let mut sim = Simulation::headless(config).unwrap();
    sim.set_visible(true, start);
    sim
}

fn run_frames(sim: &mut Simulation, start: Instant, frames: u32) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += FRAME;
        sim.frame(now);
    }
    now
}

// ============================================================================
// Long-run invariants
// ============================================================================

#[test]
fn test_bodies_stay_inside_walls_and_above_floor() {
    let start = Instant::now();
    let config = SimConfig::default().with_count(80).with_seed(5);
    let mut sim = running_sim(config, start);
    run_frames(&mut sim, start, 600);

    let config = sim.config();
    let field = sim.field();
    let eps = 1e-4;
    for i in 0..field.count() {
        let p = field.position(i);
        let r = field.radius(i);
        assert!(p.x.abs() + r <= config.max_x + eps, "body {} x={}", i, p.x);
        assert!(p.y - r >= -config.max_y - eps, "body {} y={}", i, p.y);
        assert!(p.z.abs() + r <= config.z_bound() + eps, "body {} z={}", i, p.z);
    }
}

#[test]
fn test_gravity_free_box_is_closed_on_every_axis() {
    let start = Instant::now();
    let config = SimConfig::default()
        .with_count(40)
        .with_gravity(0.0)
        .with_seed(9);
    let mut sim = running_sim(config, start);
    run_frames(&mut sim, start, 300);

    let config = sim.config();
    let field = sim.field();
    for i in 0..field.count() {
        let p = field.position(i);
        let r = field.radius(i);
        assert!(p.y.abs() + r <= config.max_y + 1e-4);
    }
}

#[test]
fn test_speed_capped_without_collisions() {
    let start = Instant::now();
    // Two small, far apart bodies never touch
    let config = SimConfig::default()
        .with_count(2)
        .with_size_range(0.1, 0.1)
        .with_size0(0.1)
        .with_gravity(50.0)
        .with_bounds(50.0, 50.0, 50.0)
        .with_seed(1);
    let mut sim = running_sim(config, start);
    run_frames(&mut sim, start, 30);

    for v in sim.field().velocities() {
        assert!(v.length() <= sim.config().max_velocity + 1e-5);
    }
}

// ============================================================================
// Pointer routing into the simulation
// ============================================================================

#[test]
fn test_pointer_drives_control_body_to_target() {
    let start = Instant::now();
    let config = SimConfig::default().with_count(10).with_seed(2);
    let mut sim = running_sim(config, start);
    sim.apply_viewport(ViewportSize::new(400.0, 400.0, 1.0));

    let mut router: PointerRouter<Simulation> = PointerRouter::new(NoHooks);
    router.register(SurfaceId(0), Rect::new(0.0, 0.0, 400.0, 400.0), ControlBinding);

    // Right edge, vertically centered
    router.pointer_moved(Vec2::new(400.0, 200.0), &mut sim);
    let target = sim.field().control_center;
    assert!((target.x - sim.config().max_x).abs() < 1e-3);
    assert!(target.y.abs() < 1e-3);

    run_frames(&mut sim, start, 120);
    assert!(sim.field().position(0).distance(target) < 1e-3);

    router.pointer_left_document(&mut sim);
    assert!(!sim.field().control_enabled);
}

#[test]
fn test_pointer_outside_surface_does_not_steer() {
    let config = SimConfig::default().with_count(4).with_seed(2);
    let mut sim = Simulation::headless(config).unwrap();

    let mut router: PointerRouter<Simulation> = PointerRouter::new(NoHooks);
    router.register(SurfaceId(0), Rect::new(100.0, 100.0, 50.0, 50.0), ControlBinding);

    router.pointer_moved(Vec2::new(10.0, 10.0), &mut sim);
    assert!(!sim.field().control_enabled);

    router.pointer_moved(Vec2::new(125.0, 125.0), &mut sim);
    assert!(sim.field().control_enabled);
}

#[test]
fn test_click_listener_toggles_pause() {
    let mut sim = Simulation::headless(SimConfig::default().with_count(3)).unwrap();
    let mut router: PointerRouter<Simulation> = PointerRouter::new(NoHooks);
    router.register(
        SurfaceId(7),
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Callbacks::new().on_click(|_, sim: &mut Simulation| sim.toggle_pause()),
    );

    router.clicked(Vec2::new(5.0, 5.0), &mut sim);
    assert!(sim.is_paused());
    router.clicked(Vec2::new(50.0, 5.0), &mut sim);
    assert!(sim.is_paused());
    router.clicked(Vec2::new(1.0, 1.0), &mut sim);
    assert!(!sim.is_paused());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_hidden_simulation_does_not_move() {
    let start = Instant::now();
    let mut sim = running_sim(SimConfig::default().with_count(20).with_seed(4), start);
    let now = run_frames(&mut sim, start, 10);

    sim.set_foreground(false, now);
    let frozen = sim.field().positions().to_vec();
    run_frames(&mut sim, now, 10);
    assert_eq!(sim.field().positions(), &frozen[..]);

    sim.set_foreground(true, now);
    run_frames(&mut sim, now, 1);
    assert_ne!(sim.field().positions(), &frozen[..]);
}

#[test]
fn test_resize_bursts_apply_once() {
    let start = Instant::now();
    let mut sim = Simulation::headless(SimConfig::default()).unwrap();

    let mut now = start;
    for width in [600.0, 700.0, 800.0] {
        sim.resize(ViewportSize::new(width, 400.0, 1.0), now);
        now += Duration::from_millis(30);
        assert!(sim.poll_resize(now).is_none());
    }

    let applied = sim.poll_resize(now + Duration::from_millis(100)).unwrap();
    assert_eq!(applied.width, 800.0);
    assert_eq!(sim.viewport(), Some(applied));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_json_config_drives_simulation() {
    let config = SimConfig::from_json_str(r#"{ "count": 12, "gravity": 0.0, "seed": 3 }"#).unwrap();
    let sim = Simulation::headless(config).unwrap();
    assert_eq!(sim.field().count(), 12);
    assert_eq!(sim.config().gravity, 0.0);
    assert_eq!(sim.config().friction, SimConfig::default().friction);
}

#[test]
fn test_invalid_json_config_rejected() {
    let err = SimConfig::from_json_str(r#"{ "min_size": 2.0, "max_size": 1.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));

    let err = SimConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
