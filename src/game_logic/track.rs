use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::game_logic::constants::*;
use crate::game_logic::rng::SeededRng;
use crate::render::SurfacePatterns;

/// One anchor of the track loop: a point plus the half-width of the road
/// around the line to the next anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackSegment {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl TrackSegment {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Where a fresh car lines up, and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartPose {
    pub position: Vec2,
    pub angle: f32,
}

/// Events the track raises while watching the car's progress around the loop.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceEvent {
    LapCrossed,
    CheckpointCrossed(usize),
}

/// A closed loop of road segments generated once from a seed.
///
/// Geometry is immutable after generation; resizing the playfield replaces
/// the whole track (same seed, new extent). The only mutable state is the
/// checkpoint cursor, which edge-detects the car moving between segments.
pub struct Track {
    pub segments: Vec<TrackSegment>,
    pub width: f32,
    pub height: f32,
    patterns: SurfacePatterns,
    last_car_segment: Option<usize>,
}

impl Track {
    pub fn new(width: f32, height: f32, seed: u32) -> Self {
        let mut rng = SeededRng::new(seed);
        let segments = generate_loop(width, height, &mut rng);
        // The surface patterns consume the same stream, directly after the
        // loop samples, so a seed fixes the whole visual description too.
        let patterns = SurfacePatterns::from_stream(&mut rng);
        Self {
            segments,
            width,
            height,
            patterns,
            last_car_segment: None,
        }
    }

    pub fn patterns(&self) -> &SurfacePatterns {
        &self.patterns
    }

    /// Endpoints of segment `index`; the loop wraps, so the far endpoint of
    /// the last segment is the first anchor.
    pub fn segment_endpoints(&self, index: usize) -> (Vec2, Vec2) {
        let next = (index + 1) % self.segments.len();
        (self.segments[index].position(), self.segments[next].position())
    }

    /// Road half-width along segment `index`, averaged between its anchors.
    pub fn segment_half_width(&self, index: usize) -> f32 {
        let next = (index + 1) % self.segments.len();
        (self.segments[index].radius + self.segments[next].radius) / 2.0
    }

    /// Index of the segment closest to `point` and the distance to it.
    /// Ties go to the lowest index.
    pub fn nearest_segment(&self, point: Vec2) -> (usize, f32) {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for index in 0..self.segments.len() {
            let (a, b) = self.segment_endpoints(index);
            let distance = point_to_segment_distance(point, a, b);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        (best, best_distance)
    }

    /// Whether `point` lies on the road: within the averaged half-width of
    /// the closest segment.
    pub fn is_on_track(&self, point: Vec2) -> bool {
        if self.segments.len() < 2 {
            return false;
        }
        let (index, distance) = self.nearest_segment(point);
        distance <= self.segment_half_width(index)
    }

    /// Scalar progress of `point` projected onto segment `index`, clamped to
    /// `[0, 1]`.
    pub fn progress_in_segment(&self, index: usize, point: Vec2) -> f32 {
        let (a, b) = self.segment_endpoints(index);
        let ab = b - a;
        let len2 = ab.length_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        ((point - a).dot(ab) / len2).clamp(0.0, 1.0)
    }

    /// Point at progress `t` along segment `index`.
    pub fn point_on_segment(&self, index: usize, t: f32) -> Vec2 {
        let (a, b) = self.segment_endpoints(index);
        a.lerp(b, t)
    }

    /// Grid position and heading for the start of a race. The car lines up
    /// offset from the start line along the first segment: behind it when
    /// racing clockwise, ahead of it (facing back) otherwise.
    pub fn starting_pose(&self, clockwise: bool) -> StartPose {
        if self.segments.len() >= 2 {
            let (a, b) = self.segment_endpoints(0);
            let mid = (a + b) / 2.0;
            let dir = b - a;
            let length = dir.length();
            if length > 0.0 {
                let tangent = dir / length;
                let heading = dir.y.atan2(dir.x).to_degrees();
                return if clockwise {
                    StartPose {
                        position: mid - tangent * START_LINE_OFFSET,
                        angle: heading,
                    }
                } else {
                    StartPose {
                        position: mid + tangent * START_LINE_OFFSET,
                        angle: heading + 180.0,
                    }
                };
            }
            return StartPose {
                position: mid,
                angle: 0.0,
            };
        }
        if let Some(first) = self.segments.first() {
            return StartPose {
                position: first.position(),
                angle: 0.0,
            };
        }
        StartPose {
            position: Vec2::new(self.width / 2.0, self.height / 2.0),
            angle: 0.0,
        }
    }

    /// Edge-detect the car moving onto a new segment. Crossing onto segment 0
    /// is a lap, onto any other multiple of four a checkpoint. Call once per
    /// tick; the first call only seeds the cursor.
    pub fn check_checkpoint_collisions(&mut self, point: Vec2) -> Option<RaceEvent> {
        let (nearest, _) = self.nearest_segment(point);
        let event = match self.last_car_segment {
            Some(previous) if previous != nearest => {
                if nearest == 0 {
                    Some(RaceEvent::LapCrossed)
                } else if nearest % CHECKPOINT_INTERVAL == 0 {
                    Some(RaceEvent::CheckpointCrossed(nearest))
                } else {
                    None
                }
            }
            _ => None,
        };
        self.last_car_segment = Some(nearest);
        event
    }

    /// Whether `point` sits in the wall band around the road. Outward from
    /// the track edge the layers run road, grass, dirt, then wall.
    pub fn in_wall_zone(&self, point: Vec2) -> bool {
        if self.segments.len() < 2 {
            return false;
        }
        let (index, distance) = self.nearest_segment(point);
        let edge = self.segment_half_width(index);
        let grass_edge = edge + GRASS_THICKNESS / 2.0 - (WALL_THICKNESS - GRASS_THICKNESS) + 25.0;
        let wall_edge = edge + WALL_THICKNESS / 2.0;
        distance > grass_edge && distance <= wall_edge
    }
}

/// Distance from `point` to the segment `a`-`b`, clamping the projection to
/// the segment. Zero-length segments degrade to plain point distance.
pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len2).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Sample anchors roughly evenly around the playfield center, jittering both
/// the angle within its slot and the distance from center. Anchors keep their
/// sampling order even when jitter folds the polygon over itself; a
/// self-crossing loop is a legal track.
fn generate_loop(width: f32, height: f32, rng: &mut SeededRng) -> Vec<TrackSegment> {
    let count = (rng.next() * SEGMENT_COUNT_SPREAD) as usize + SEGMENT_COUNT_BASE;
    let center = Vec2::new(width / 2.0, height / 2.0);
    let jitter = (TAU / count as f32) * TRACK_ANGLE_JITTER;

    let mut segments = Vec::with_capacity(count);
    for i in 0..count {
        let angle = (i as f32 * TAU) / count as f32 + (rng.next() - 0.5) * jitter;
        let dist = TRACK_BASE_RADIUS + (rng.next() - 0.5) * TRACK_RADIUS_VARIATION;
        let x = center.x + dist * angle.cos();
        let y = center.y + dist * angle.sin();
        let radius = TRACK_BASE_HALF_WIDTH + (rng.next() - 0.5) * TRACK_HALF_WIDTH_VARIATION;
        segments.push(TrackSegment { x, y, radius });
    }
    segments
}
