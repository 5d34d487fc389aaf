//! Stride - headless locomotion walkthrough
//!
//! Drops a capsule onto a floor and plays a scripted input track through the
//! player controller, logging where the character ends up.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use winit::keyboard::KeyCode;

use stride_core::{GameTime, TimeConfig};
use stride_game::{AnimatorParameters, InputHandler, PlayerController};
use stride_physics::{CharacterBody, PhysicsWorld};

use settings::{LoadOutcome, Settings};

/// A key change at a point in simulated time
struct ScriptEvent {
    at: f32,
    key: KeyCode,
    pressed: bool,
}

const fn press(at: f32, key: KeyCode) -> ScriptEvent {
    ScriptEvent {
        at,
        key,
        pressed: true,
    }
}

const fn release(at: f32, key: KeyCode) -> ScriptEvent {
    ScriptEvent {
        at,
        key,
        pressed: false,
    }
}

/// Settle, walk, sprint, dodge mid-sprint, strafe right, then stop
const SCRIPT: &[ScriptEvent] = &[
    press(1.0, KeyCode::KeyW),
    press(3.0, KeyCode::ShiftLeft),
    press(4.0, KeyCode::Space),
    release(4.1, KeyCode::Space),
    release(5.0, KeyCode::ShiftLeft),
    release(5.0, KeyCode::KeyW),
    press(5.0, KeyCode::KeyD),
    release(6.0, KeyCode::KeyD),
];

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn main() -> Result<()> {
    let (settings, outcome) = Settings::load(config_path_from_args().as_deref());

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.simulation.level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match outcome {
        LoadOutcome::Loaded(path) => info!("Loaded settings from {:?}", path),
        LoadOutcome::Missing(Some(path)) => info!("No settings file at {:?}, using defaults", path),
        LoadOutcome::Missing(None) => warn!("Could not determine config directory, using defaults"),
        LoadOutcome::Invalid(path, e) => warn!("Failed to load {:?}: {}, using defaults", path, e),
    }

    info!("Starting stride walkthrough...");

    let sim = &settings.simulation;
    let mut physics = PhysicsWorld::new();
    physics.create_ground(0.0);
    physics.create_static_box(Vec3::new(0.5, 1.0, 4.0), Vec3::new(6.0, 1.0, 6.0));

    let mut body = CharacterBody::new();
    body.spawn(&mut physics, Vec3::new(0.0, sim.spawn_height, 0.0));
    physics.refresh_queries();

    let mut player = PlayerController::builder()
        .config(settings.movement.clone())
        .motor(body)
        .animator(AnimatorParameters::new())
        .build()
        .context("Failed to build player controller")?;

    // One-time, process-wide
    let mut input = InputHandler::new();
    if player.wants_cursor_capture() {
        input.request_cursor_capture();
    }

    let mut time = GameTime::new(TimeConfig {
        fixed_timestep: sim.fixed_timestep,
        ..Default::default()
    });
    let dt = time.fixed_timestep();
    let mut steps: u64 = 0;
    let mut next_event = 0;
    let mut next_report = 1.0;

    while time.total_time < sim.duration_secs as f64 {
        time.update(dt);
        for _ in 0..time.fixed_steps() {
            steps += 1;
            let now = steps as f32 * dt;
            while let Some(event) = SCRIPT.get(next_event).filter(|e| e.at <= now) {
                if event.pressed {
                    input.press(event.key);
                } else {
                    input.release(event.key);
                }
                next_event += 1;
            }

            let sample = input.sample();
            player.fixed_update(&mut physics, &sample, sim.camera_yaw, dt);
            input.end_frame();
            physics.refresh_queries();

            if now >= next_report {
                let state = player.locomotion().state();
                info!(
                    t = now,
                    position = ?player.transform().position,
                    facing = state.facing,
                    speed = state.speed,
                    grounded = state.grounded,
                    animation = ?state.animation,
                    "Player status"
                );
                next_report += 1.0;
            }
        }
    }

    input.release_cursor();

    let transform = player.transform();
    info!(
        "Walkthrough finished after {} steps at {:?}, facing {:.1} degrees",
        steps,
        transform.position,
        transform.yaw()
    );
    Ok(())
}
