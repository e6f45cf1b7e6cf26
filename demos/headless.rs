//! # Headless Ballpit
//!
//! Runs the simulation without a window, steering the control body in a
//! circle, and logs a few bodies once per simulated second.
//!
//! Run with: `cargo run --example headless [frames]`

use std::time::{Duration, Instant};

use ballpit::prelude::*;

const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), ballpit::ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(600);

    let mut sim = Simulation::headless(SimConfig::default().with_count(60).with_seed(7))?;
    let binding = ControlBinding;

    let start = Instant::now();
    sim.apply_viewport(ViewportSize::new(1280.0, 720.0, 1.0));
    sim.set_visible(true, start);

    for i in 1..=frames {
        let now = start + FRAME * i as u32;
        let angle = i as f32 * 0.02;
        sim.steer(&binding, Vec2::new(angle.cos() * 0.5, angle.sin() * 0.5));

        let Some(tick) = sim.frame(now) else {
            continue;
        };
        if i % 60 == 0 {
            let field = sim.field();
            log::info!(
                "t={:.2}s control={:?} body1={:?} body2={:?}",
                tick.elapsed,
                field.position(0),
                field.position(1),
                field.position(2)
            );
        }
    }

    sim.dispose();
    Ok(())
}
