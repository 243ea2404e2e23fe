use bevy::prelude::*;

use crate::game_logic::constants::*;
use crate::game_logic::input::InputState;
use crate::game_logic::track::Track;

/// Drift sub-state. Charging locks a turn direction and accumulates time
/// toward discrete charge levels; the boost countdown is deliberately NOT
/// part of this enum because a drift can begin while a boost is still
/// running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drift {
    Idle,
    Charging {
        /// -1 while drifting left, 1 while drifting right.
        direction: i8,
        timer: f32,
        level: u8,
    },
}

impl Drift {
    pub fn is_charging(&self) -> bool {
        matches!(self, Drift::Charging { .. })
    }

    pub fn level(&self) -> u8 {
        match self {
            Drift::Charging { level, .. } => *level,
            Drift::Idle => 0,
        }
    }
}

/// The player's vehicle: kinematic pose plus drift/boost state. Created once
/// per race attempt; `reset` clears the transient fields without replacing
/// the entity.
#[derive(Clone, Debug)]
pub struct Car {
    pub x: f32,
    pub y: f32,
    /// Heading in degrees. Accumulates without wraparound.
    pub angle: f32,
    /// Signed scalar speed; negative while reversing.
    pub speed: f32,
    pub drift: Drift,
    pub boost_timer: f32,
    pub on_track: bool,
    friction: f32,
}

impl Car {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            angle: 0.0,
            speed: 0.0,
            drift: Drift::Idle,
            boost_timer: 0.0,
            on_track: true,
            friction: ROAD_FRICTION,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn reset(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.angle = 0.0;
        self.speed = 0.0;
        self.drift = Drift::Idle;
        self.boost_timer = 0.0;
        self.on_track = true;
        self.friction = ROAD_FRICTION;
    }

    /// Advance one tick. `dt` must already be clamped by the caller; the car
    /// itself never rejects input, it only saturates.
    pub fn update(&mut self, dt: f32, input: InputState, track: &Track) {
        self.handle_drift(dt, input);

        // Throttle, brake, or coast down on friction. The friction value is
        // the one cached from the previous tick's surface contact.
        if input.up {
            self.speed += ACCEL_RATE * dt;
        } else if input.down {
            if self.speed > 0.0 {
                self.speed -= BRAKE_POWER * dt;
            } else {
                self.speed -= ACCEL_RATE * REVERSE_ACCEL_FACTOR * dt;
            }
        } else if self.speed > 0.0 {
            self.speed = (self.speed - self.friction * dt).max(0.0);
        } else if self.speed < 0.0 {
            self.speed = (self.speed + self.friction * dt).min(0.0);
        }

        // Steering. A drift overrides the wheel toward its locked direction:
        // full lock steering into it, a shallow 0.3 against, 0.5 hands-off.
        let mut steer = (input.right as i32 - input.left as i32) as f32;
        let mut turn_speed = BASE_TURN_SPEED;
        if let Drift::Charging { direction, .. } = self.drift {
            let tightness = if direction < 0 {
                if input.left {
                    1.0
                } else if input.right {
                    0.3
                } else {
                    0.5
                }
            } else if input.right {
                1.0
            } else if input.left {
                0.3
            } else {
                0.5
            };
            steer = direction as f32 * tightness;
            turn_speed *= DRIFT_TURN_MULTIPLIER;
        }
        let speed_factor = (self.speed.abs() / FULL_TURN_SPEED).min(1.0);
        let applied_turn = turn_speed * speed_factor * steer * dt;
        if self.speed < 0.0 {
            self.angle -= applied_turn;
        } else {
            self.angle += applied_turn;
        }

        // Manual boost, plus the sustained push while any boost timer runs.
        if input.boost {
            self.trigger_boost(true);
        }
        if self.boost_timer > 0.0 {
            self.speed += BOOST_FORCE * dt;
            self.boost_timer -= dt;
        }

        // Surface contact decides this tick's speed cap and the friction the
        // next tick will coast on.
        self.on_track = track.is_on_track(self.position());
        self.friction = if self.on_track {
            ROAD_FRICTION
        } else {
            OFFROAD_FRICTION
        };
        self.speed = self.speed.clamp(REVERSE_MAX, self.current_max_speed());

        let heading = self.angle.to_radians();
        self.x += heading.cos() * self.speed * dt;
        self.y += heading.sin() * self.speed * dt;
    }

    /// Top speed under the current combination of surface contact, drift,
    /// and boost. Boost overrides everything else.
    pub fn current_max_speed(&self) -> f32 {
        if self.boost_timer > 0.0 {
            return BOOSTED_MAX_SPEED;
        }
        let mut max = MAX_SPEED;
        if !self.on_track {
            max *= OFFROAD_SPEED_FACTOR;
        }
        if self.drift.is_charging() {
            max *= DRIFT_SPEED_FACTOR;
        }
        max
    }

    fn handle_drift(&mut self, dt: f32, input: InputState) {
        // Too slow to hold a drift: cancel without any reward.
        if self.speed.abs() < DRIFT_MIN_SPEED {
            self.drift = Drift::Idle;
            return;
        }

        if input.drift && !self.drift.is_charging() && (input.left || input.right) {
            self.drift = Drift::Charging {
                direction: if input.left { -1 } else { 1 },
                timer: 0.0,
                level: 0,
            };
        }

        if let Drift::Charging { direction, timer, level } = self.drift {
            let timer = timer + dt;
            let mut level = level;
            if timer > DRIFT_CHARGE_STAGE_1 && level < 1 {
                level = 1;
            }
            if timer > DRIFT_CHARGE_STAGE_2 && level < 2 {
                level = 2;
            }
            if timer > DRIFT_CHARGE_STAGE_3 && level < 3 {
                level = 3;
            }
            self.drift = Drift::Charging { direction, timer, level };
            if !input.drift {
                self.release_drift();
            }
        }
    }

    /// Resolve a drift: level 2 pays out half a boost, level 3 a full one,
    /// anything less nothing.
    fn release_drift(&mut self) {
        let multiplier = match self.drift.level() {
            2 => 0.5,
            3 => 1.0,
            _ => 0.0,
        };
        if multiplier > 0.0 {
            self.speed += multiplier * BOOST_FORCE;
            self.boost_timer = BOOST_DURATION;
        }
        self.drift = Drift::Idle;
    }

    fn trigger_boost(&mut self, full: bool) {
        self.boost_timer = BOOST_DURATION;
        self.speed += if full { BOOST_FORCE } else { BOOST_FORCE * 0.5 };
        if self.speed > BOOSTED_MAX_SPEED {
            self.speed = BOOSTED_MAX_SPEED;
        }
    }
}
