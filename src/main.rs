mod host_input;
mod host_render;

use bevy::prelude::*;
use bevy::render::camera::Projection;
use bevy::window::{PresentMode, WindowResized};
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use daily_drift::config::RaceSettings;
use daily_drift::game_logic::{Race, RaceEvent, CHECKPOINT_INTERVAL};

use host_input::sample_input;
use host_render::{build_frame_assets, render_frame};

// Initial window extent; the track regenerates whenever the window resizes.
pub const WIN_W: f32 = 1280.;
pub const WIN_H: f32 = 720.;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Daily Drift".into(),
                resolution: (WIN_W, WIN_H).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::WHITE))
        .insert_resource(RaceSettings::load("assets/race-settings.json"))
        .add_event::<RaceEvent>()
        .add_systems(Startup, (camera_setup, race_setup, build_frame_assets).chain())
        .add_systems(
            Update,
            (
                run_race_frame,
                restart_race,
                handle_resize,
                log_race_events,
                render_frame,
            )
                .chain(),
        )
        .run();
}

fn camera_setup(mut commands: Commands) {
    let mut projection = OrthographicProjection::default_2d();
    projection.scale = 1.0;
    commands
        .spawn(Camera2d::default())
        .insert(Projection::Orthographic(projection));
}

fn race_setup(mut commands: Commands, settings: Res<RaceSettings>) {
    let seed = settings.seed.unwrap_or_else(wall_clock_seed);
    let clockwise = settings
        .clockwise
        .unwrap_or_else(|| rand::rng().random_bool(0.5));
    info!(
        "race seed {seed}, running {}",
        if clockwise { "clockwise" } else { "counter-clockwise" }
    );

    let mut race = Race::new(WIN_W, WIN_H, seed, clockwise);
    race.start();
    commands.insert_resource(race);
}

// Each launch gets its own track unless the settings pin a seed.
fn wall_clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or(0)
}

/// Pump the simulation once per rendered frame with the current held keys.
fn run_race_frame(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut race: ResMut<Race>,
    mut events: EventWriter<RaceEvent>,
) {
    let input = sample_input(&keys);
    if let Some(event) = race.frame(time.elapsed_secs_f64(), input) {
        events.write(event);
    }
}

/// "R" puts the car back on the grid, coin-flipping the direction like a
/// fresh launch does.
fn restart_race(keys: Res<ButtonInput<KeyCode>>, mut race: ResMut<Race>) {
    if keys.just_pressed(KeyCode::KeyR) {
        race.reset_to_start(rand::rng().random_bool(0.5));
    }
}

/// Regenerate the track for the new window extent, keeping the car anchored
/// to its segment.
fn handle_resize(mut resize_events: EventReader<WindowResized>, mut race: ResMut<Race>) {
    for resized in resize_events.read() {
        race.resize(resized.width, resized.height);
    }
}

/// The timing collaborator lives outside this crate; surface its events in
/// the log.
fn log_race_events(mut events: EventReader<RaceEvent>) {
    for event in events.read() {
        match event {
            RaceEvent::LapCrossed => info!("start/finish line crossed"),
            RaceEvent::CheckpointCrossed(index) => {
                info!("checkpoint {} crossed", index / CHECKPOINT_INTERVAL)
            }
        }
    }
}
