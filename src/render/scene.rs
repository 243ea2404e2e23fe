use bevy::prelude::*;

use crate::game_logic::constants::*;
use crate::game_logic::race::Race;
use crate::game_logic::track::Track;
use crate::game_logic::Car;
use crate::render::commands::{DrawCommand, Stroke, Surface};

/// Describe one frame as an ordered command list: clear, camera transform,
/// world layers (grid, track, car), then the screen-space HUD.
pub fn compose_frame(race: &Race, width: f32, height: f32, debug: bool) -> Vec<DrawCommand> {
    let mut frame = Vec::new();
    frame.push(DrawCommand::Clear { width, height });
    frame.push(DrawCommand::SetTransform {
        zoom: race.camera.zoom,
        translate: Vec2::new(race.camera.x, race.camera.y),
    });

    push_grid(&mut frame, width, height);
    push_track(&mut frame, &race.track);
    push_start_line(&mut frame, &race.track);
    push_checkpoints(&mut frame, &race.track);
    if debug {
        push_debug_probe(&mut frame, &race.track, race.car.position());
    }
    push_car(&mut frame, &race.car);

    frame.push(DrawCommand::ResetTransform);
    push_hud(&mut frame, &race.car, race.smoothed_fps(), height);
    frame
}

/// Faint backdrop grid, oversized so the camera never scrolls past its edge.
fn push_grid(frame: &mut Vec<DrawCommand>, width: f32, height: f32) {
    let w = width * 10.0;
    let h = height * 10.0;
    frame.push(DrawCommand::FillRect {
        center: Vec2::ZERO,
        size: Vec2::new(w, h),
        rotation: 0.0,
        color: Color::srgba(0.17, 0.17, 0.17, 0.12),
    });

    let line = Color::srgba(0.27, 0.27, 0.27, 0.12);
    let step = 40.0;
    let mut x = -w / 2.0;
    while x <= w / 2.0 {
        frame.push(DrawCommand::StrokeLine {
            from: Vec2::new(x, -h / 2.0),
            to: Vec2::new(x, h / 2.0),
            width: 1.0,
            stroke: Stroke::Solid(line),
            dash: None,
        });
        x += step;
    }
    let mut y = -h / 2.0;
    while y <= h / 2.0 {
        frame.push(DrawCommand::StrokeLine {
            from: Vec2::new(-w / 2.0, y),
            to: Vec2::new(w / 2.0, y),
            width: 1.0,
            stroke: Stroke::Solid(line),
            dash: None,
        });
        y += step;
    }
}

/// The road ribbon, widest band first: wall, grass, dirt, then the asphalt
/// surface and its dashed centerline. Round joints come from a disc at each
/// anchor under the segment strokes.
fn push_track(frame: &mut Vec<DrawCommand>, track: &Track) {
    let n = track.segments.len();
    if n < 2 {
        return;
    }

    let layers: [(f32, Stroke, Color); 3] = [
        (WALL_THICKNESS, Stroke::Solid(Color::BLACK), Color::BLACK),
        (
            GRASS_THICKNESS,
            Stroke::Pattern(Surface::Grass),
            track.patterns().grass.base_color(),
        ),
        (
            DIRT_THICKNESS,
            Stroke::Pattern(Surface::Dirt),
            track.patterns().dirt.base_color(),
        ),
    ];

    for (extra, stroke, joint_color) in layers {
        for i in 0..n {
            let (a, b) = track.segment_endpoints(i);
            let width = track.segments[i].radius + track.segments[(i + 1) % n].radius + extra;
            frame.push(DrawCommand::FillCircle {
                center: a,
                radius: width / 2.0,
                color: joint_color,
            });
            frame.push(DrawCommand::StrokeLine {
                from: a,
                to: b,
                width,
                stroke,
                dash: None,
            });
        }
    }

    let asphalt_joint = track.patterns().asphalt.base_color();
    for i in 0..n {
        let (a, b) = track.segment_endpoints(i);
        let width =
            (track.segments[i].radius + track.segments[(i + 1) % n].radius).min(ASPHALT_MAX_WIDTH);
        frame.push(DrawCommand::FillCircle {
            center: a,
            radius: width / 2.0,
            color: asphalt_joint,
        });
        frame.push(DrawCommand::StrokeLine {
            from: a,
            to: b,
            width,
            stroke: Stroke::Pattern(Surface::Asphalt),
            dash: None,
        });
    }

    for i in 0..n {
        let (a, b) = track.segment_endpoints(i);
        frame.push(DrawCommand::StrokeLine {
            from: a,
            to: b,
            width: 4.0,
            stroke: Stroke::Solid(Color::WHITE),
            dash: Some([20.0, 20.0]),
        });
    }
}

/// Two offset rows of checkers across the road at the midpoint of the first
/// segment.
fn push_start_line(frame: &mut Vec<DrawCommand>, track: &Track) {
    if track.segments.len() < 2 {
        return;
    }
    let (a, b) = track.segment_endpoints(0);
    let mid = (a + b) / 2.0;
    let dir = b - a;
    let length = dir.length();
    if length == 0.0 {
        return;
    }
    let tangent = dir / length;
    let perp = Vec2::new(-tangent.y, tangent.x);
    let rotation = tangent.y.atan2(tangent.x);

    let track_width = (track.segments[0].radius + track.segments[1].radius) / 1.2;
    let checker = track_width / 8.0;
    let columns = (track_width / checker) as i32;

    for row in 0..2 {
        for col in 0..columns {
            let offset = (col as f32 - columns as f32 / 2.0) * checker;
            let center = mid + perp * offset + tangent * (checker * row as f32);
            let color = if (col + row) % 2 == 0 {
                Color::BLACK
            } else {
                Color::WHITE
            };
            frame.push(DrawCommand::FillRect {
                center,
                size: Vec2::splat(checker),
                rotation,
                color,
            });
        }
    }
}

/// A white line across the road at every fourth segment after the start.
fn push_checkpoints(frame: &mut Vec<DrawCommand>, track: &Track) {
    let n = track.segments.len();
    if n < 2 {
        return;
    }
    let mut i = CHECKPOINT_INTERVAL;
    while i < n {
        let (a, b) = track.segment_endpoints(i);
        let dir = b - a;
        let length = dir.length();
        if length > 0.0 {
            let mid = (a + b) / 2.0;
            let tangent = dir / length;
            let perp = Vec2::new(-tangent.y, tangent.x);
            let half = (track.segments[i].radius + track.segments[(i + 1) % n].radius) / 4.0;
            frame.push(DrawCommand::StrokeLine {
                from: mid - perp * half,
                to: mid + perp * half,
                width: 6.0,
                stroke: Stroke::Solid(Color::WHITE),
                dash: None,
            });
        }
        i += CHECKPOINT_INTERVAL;
    }
}

/// Debug aid: a line from the car to its projection on the nearest segment.
fn push_debug_probe(frame: &mut Vec<DrawCommand>, track: &Track, car: Vec2) {
    let (index, _) = track.nearest_segment(car);
    let t = track.progress_in_segment(index, car);
    let closest = track.point_on_segment(index, t);
    frame.push(DrawCommand::StrokeLine {
        from: car,
        to: closest,
        width: 2.0,
        stroke: Stroke::Solid(Color::srgb(1.0, 1.0, 0.0)),
        dash: None,
    });
    frame.push(DrawCommand::FillCircle {
        center: closest,
        radius: 4.0,
        color: Color::srgb(1.0, 0.0, 0.0),
    });
}

fn push_car(frame: &mut Vec<DrawCommand>, car: &Car) {
    let position = car.position();
    let rotation = car.angle.to_radians();
    let facing = Vec2::from_angle(rotation);

    frame.push(DrawCommand::FillRect {
        center: position,
        size: Vec2::new(CAR_LENGTH, CAR_WIDTH),
        rotation,
        color: Color::srgb(1.0, 0.8, 0.0),
    });

    // Nose marker on the front quarter of the body.
    let nose_offset = facing.rotate(Vec2::new(CAR_LENGTH / 4.0 + CAR_LENGTH / 12.0, 0.0));
    frame.push(DrawCommand::FillRect {
        center: position + nose_offset,
        size: Vec2::new(CAR_LENGTH / 6.0, CAR_WIDTH / 3.0),
        rotation,
        color: Color::srgb_u8(187, 51, 51),
    });

    // Charge bar above the roof while a drift is held.
    if car.drift.is_charging() {
        let color = match car.drift.level() {
            2 => Color::srgb(1.0, 0.65, 0.0),
            3 => Color::srgb(0.5, 0.0, 0.5),
            _ => Color::srgb(0.0, 0.0, 1.0),
        };
        let bar_offset = facing.rotate(Vec2::new(0.0, -(CAR_WIDTH / 2.0 + 4.0)));
        frame.push(DrawCommand::FillRect {
            center: position + bar_offset,
            size: Vec2::new(CAR_LENGTH, 4.0),
            rotation,
            color,
        });
    }
}

fn push_hud(frame: &mut Vec<DrawCommand>, car: &Car, fps: f32, height: f32) {
    let color = Color::BLACK;
    frame.push(DrawCommand::Text {
        text: format!("fps: {:.0}", fps),
        position: Vec2::new(10.0, height - 62.0),
        color,
    });
    frame.push(DrawCommand::Text {
        text: format!("pos: {:.1}, {:.1}", car.x, car.y),
        position: Vec2::new(10.0, height - 46.0),
        color,
    });
    frame.push(DrawCommand::Text {
        text: format!("speed: {:.2}", car.speed),
        position: Vec2::new(10.0, height - 30.0),
        color,
    });
    frame.push(DrawCommand::Text {
        text: format!("angle: {:.2}\u{b0}", car.angle),
        position: Vec2::new(10.0, height - 14.0),
        color,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_for(debug: bool) -> (Race, Vec<DrawCommand>) {
        let mut race = Race::new(800.0, 600.0, 12345, true);
        race.start();
        let frame = compose_frame(&race, 800.0, 600.0, debug);
        (race, frame)
    }

    #[test]
    fn test_frame_opens_with_clear_then_camera() {
        let (race, frame) = frame_for(false);
        assert_eq!(
            frame[0],
            DrawCommand::Clear {
                width: 800.0,
                height: 600.0
            }
        );
        assert_eq!(
            frame[1],
            DrawCommand::SetTransform {
                zoom: race.camera.zoom,
                translate: Vec2::new(race.camera.x, race.camera.y),
            }
        );
    }

    #[test]
    fn test_hud_comes_after_reset_transform() {
        let (_, frame) = frame_for(false);
        let reset_at = frame
            .iter()
            .position(|c| matches!(c, DrawCommand::ResetTransform))
            .expect("frame resets the transform");
        for (index, command) in frame.iter().enumerate() {
            if let DrawCommand::Text { .. } = command {
                assert!(index > reset_at);
            }
        }
        let labels = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();
        assert_eq!(labels, 4);
    }

    #[test]
    fn test_one_asphalt_stroke_per_segment() {
        let (race, frame) = frame_for(false);
        let asphalt = frame
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::StrokeLine {
                        stroke: Stroke::Pattern(Surface::Asphalt),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(asphalt, race.track.segments.len());
    }

    #[test]
    fn test_asphalt_width_is_capped() {
        let (_, frame) = frame_for(false);
        for command in &frame {
            if let DrawCommand::StrokeLine {
                stroke: Stroke::Pattern(Surface::Asphalt),
                width,
                ..
            } = command
            {
                assert!(*width <= ASPHALT_MAX_WIDTH);
            }
        }
    }

    #[test]
    fn test_only_the_centerline_is_dashed() {
        let (_, frame) = frame_for(false);
        let mut dashed = 0;
        for command in &frame {
            if let DrawCommand::StrokeLine {
                dash: Some(pattern),
                stroke,
                width,
                ..
            } = command
            {
                dashed += 1;
                assert_eq!(*pattern, [20.0, 20.0]);
                assert_eq!(*width, 4.0);
                assert_eq!(*stroke, Stroke::Solid(Color::WHITE));
            }
        }
        assert_eq!(dashed, 20);
    }

    #[test]
    fn test_debug_probe_is_opt_in() {
        let (_, plain) = frame_for(false);
        let (_, probed) = frame_for(true);
        assert_eq!(probed.len(), plain.len() + 2);
    }

    #[test]
    fn test_checkpoint_lines_skip_the_start() {
        let (race, frame) = frame_for(false);
        let expected = (race.track.segments.len() - 1) / CHECKPOINT_INTERVAL;
        let checkpoint_lines = frame
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::StrokeLine {
                        width,
                        stroke: Stroke::Solid(color),
                        dash: None,
                        ..
                    } if *width == 6.0 && *color == Color::WHITE
                )
            })
            .count();
        assert_eq!(checkpoint_lines, expected);
    }

    #[test]
    fn test_drift_charge_bar_appears_while_charging() {
        let mut race = Race::new(800.0, 600.0, 12345, true);
        race.start();
        let base = compose_frame(&race, 800.0, 600.0, false).len();

        race.car.speed = 300.0;
        race.car.drift = crate::game_logic::Drift::Charging {
            direction: 1,
            timer: 0.1,
            level: 0,
        };
        let charged = compose_frame(&race, 800.0, 600.0, false).len();
        assert_eq!(charged, base + 1);
    }
}
