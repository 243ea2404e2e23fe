use bevy::prelude::*;

use daily_drift::game_logic::InputState;

/// Read the currently held keys into the per-tick input snapshot. Arrows
/// mirror WASD, space holds a drift, shift fires a boost.
pub fn sample_input(keys: &ButtonInput<KeyCode>) -> InputState {
    InputState {
        up: keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp),
        down: keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown),
        left: keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft),
        right: keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight),
        drift: keys.pressed(KeyCode::Space),
        boost: keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight),
    }
}
