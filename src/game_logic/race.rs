use bevy::prelude::*;

use crate::game_logic::camera::ChaseCamera;
use crate::game_logic::car::Car;
use crate::game_logic::constants::*;
use crate::game_logic::input::InputState;
use crate::game_logic::track::{RaceEvent, Track};

/// The running race: car, track, and chase camera, plus the frame
/// bookkeeping that keeps the integrator stable. The host pumps
/// [`Race::frame`] once per scheduled frame; tests pump it through a
/// scripted clock instead.
#[derive(Resource)]
pub struct Race {
    pub car: Car,
    pub track: Track,
    pub camera: ChaseCamera,
    seed: u32,
    running: bool,
    last_frame: Option<f64>,
    smoothed_fps: f32,
}

impl Race {
    /// Build a race on a fresh track. A playfield without positive area is
    /// unusable, so that is fatal here rather than limping along.
    pub fn new(width: f32, height: f32, seed: u32, clockwise: bool) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "race needs a positive playfield extent, got {width}x{height}"
        );
        let track = Track::new(width, height, seed);
        let pose = track.starting_pose(clockwise);
        let mut car = Car::new(pose.position.x, pose.position.y);
        car.angle = pose.angle;
        Self {
            car,
            track,
            camera: ChaseCamera::new(width, height),
            seed,
            running: false,
            last_frame: None,
            smoothed_fps: 0.0,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_frame = None;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// One scheduled frame at wall-clock time `now` (seconds). The elapsed
    /// time is clamped to [`MAX_FRAME_DELTA`] so a long hitch (a background
    /// tab, a debugger pause) never explodes the integration step.
    pub fn frame(&mut self, now: f64, input: InputState) -> Option<RaceEvent> {
        if !self.running {
            return None;
        }
        let elapsed = match self.last_frame {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last_frame = Some(now);
        let dt = elapsed.min(MAX_FRAME_DELTA).max(0.0);
        if dt > 0.0 {
            self.smoothed_fps += (1.0 / dt - self.smoothed_fps) * FPS_SMOOTHING;
        }
        self.tick(dt, input)
    }

    /// Advance the simulation by an already-clamped `dt`: car, then camera,
    /// then the checkpoint cursor.
    pub fn tick(&mut self, dt: f32, input: InputState) -> Option<RaceEvent> {
        self.car.update(dt, input, &self.track);
        self.camera
            .update(self.car.x, self.car.y, self.car.angle, self.car.speed, dt);
        self.track.check_checkpoint_collisions(self.car.position())
    }

    /// Regenerate the track for a new playfield extent while keeping the
    /// car where it was relative to the road: same segment index, same
    /// progress along it. The heading is deliberately left untouched rather
    /// than re-derived from the new segment direction.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            warn!("ignoring resize to degenerate extent {width}x{height}");
            return;
        }
        self.camera.resize(width, height);

        let (segment, _) = self.track.nearest_segment(self.car.position());
        let progress = self.track.progress_in_segment(segment, self.car.position());

        self.track = Track::new(width, height, self.seed);

        let anchored = self.track.point_on_segment(segment, progress);
        self.car.x = anchored.x;
        self.car.y = anchored.y;
    }

    /// Put the car back on the grid (the "R" key). The race direction may
    /// differ from the previous attempt.
    pub fn reset_to_start(&mut self, clockwise: bool) {
        let pose = self.track.starting_pose(clockwise);
        self.car.reset(pose.position.x, pose.position.y);
        self.car.angle = pose.angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_race() -> Race {
        let mut race = Race::new(800.0, 600.0, 12345, true);
        race.start();
        race
    }

    #[test]
    fn test_frames_are_ignored_while_stopped() {
        let mut race = Race::new(800.0, 600.0, 12345, true);
        let origin = race.car.position();
        race.car.speed = 100.0;
        assert_eq!(race.frame(1.0, InputState::default()), None);
        assert_eq!(race.car.position(), origin);

        race.start();
        race.frame(1.0, InputState::default());
        race.stop();
        let parked = race.car.position();
        race.frame(2.0, InputState::default());
        assert_eq!(race.car.position(), parked);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut race = started_race();
        race.frame(10.0, InputState::default());
        // A second start must not reset the frame clock of a running race.
        race.start();
        race.car.speed = 120.0;
        race.frame(10.0 + 1.0 / 60.0, InputState::default());
        assert!(race.car.speed < 120.0); // friction applied over a real dt
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut race = started_race();
        race.car.speed = 100.0;
        race.frame(0.0, InputState::default());

        let before = race.car.position();
        let speed = race.car.speed;
        // Ten real seconds between frames still advances at most 0.05s.
        race.frame(10.0, InputState::default());
        let expected = (speed - ROAD_FRICTION * MAX_FRAME_DELTA) * MAX_FRAME_DELTA;
        assert!((race.car.position().distance(before) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_fps_settles_on_the_frame_rate() {
        let mut race = started_race();
        for i in 0..240 {
            race.frame(i as f64 / 60.0, InputState::default());
        }
        assert!((race.smoothed_fps() - 60.0).abs() < 1.0);
    }

    #[test]
    fn test_car_starts_on_the_grid() {
        let race = Race::new(800.0, 600.0, 12345, true);
        let pose = race.track.starting_pose(true);
        assert_eq!(race.car.position(), pose.position);
        assert_eq!(race.car.angle, pose.angle);
        assert!(race.track.is_on_track(race.car.position()));
    }

    #[test]
    fn test_resize_preserves_segment_and_progress() {
        let mut race = started_race();
        let target = race.track.point_on_segment(3, 0.5);
        race.car.x = target.x;
        race.car.y = target.y;
        race.car.angle = 42.0;

        race.resize(1024.0, 768.0);

        let (segment, _) = race.track.nearest_segment(race.car.position());
        assert_eq!(segment, 3);
        let progress = race.track.progress_in_segment(3, race.car.position());
        assert!((progress - 0.5).abs() < 1e-3);
        // Heading survives resize bit-for-bit.
        assert_eq!(race.car.angle, 42.0);
    }

    #[test]
    fn test_resize_regenerates_identical_shape() {
        let mut race = started_race();
        let old_len = race.track.segments.len();
        let old_first = race.track.segments[0];
        race.resize(1600.0, 1200.0);
        assert_eq!(race.track.segments.len(), old_len);
        // Same seed, new center: the loop translates with the midpoint.
        assert!((race.track.segments[0].x - old_first.x - 400.0).abs() < 1e-2);
        assert!((race.track.segments[0].y - old_first.y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn test_resize_rejects_degenerate_extent() {
        let mut race = started_race();
        let segments = race.track.segments.clone();
        let position = race.car.position();
        race.resize(0.0, 600.0);
        race.resize(800.0, -4.0);
        assert_eq!(race.track.segments, segments);
        assert_eq!(race.car.position(), position);
    }

    #[test]
    fn test_checkpoint_events_surface_through_frames() {
        let mut race = started_race();
        race.frame(0.0, InputState::default());

        let mut teleport = |race: &mut Race, index: usize, at: f64| {
            let point = race.track.point_on_segment(index, 0.5);
            race.car.x = point.x;
            race.car.y = point.y;
            race.car.speed = 0.0;
            race.frame(at, InputState::default())
        };

        // The opening frame seeded the cursor near the start line already,
        // so moving to segment 1 is quiet, and returning to 0 laps.
        assert_eq!(teleport(&mut race, 1, 0.02), None);
        assert_eq!(teleport(&mut race, 0, 0.04), Some(RaceEvent::LapCrossed));
        assert_eq!(
            teleport(&mut race, 8, 0.06),
            Some(RaceEvent::CheckpointCrossed(8))
        );
    }

    #[test]
    fn test_reset_to_start_reposes_the_car() {
        let mut race = started_race();
        race.car.x += 500.0;
        race.car.speed = 300.0;
        race.reset_to_start(false);
        let pose = race.track.starting_pose(false);
        assert_eq!(race.car.position(), pose.position);
        assert_eq!(race.car.angle, pose.angle);
        assert_eq!(race.car.speed, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_extent_is_fatal_at_construction() {
        let _ = Race::new(0.0, 600.0, 1, true);
    }
}
