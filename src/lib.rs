//! Daily Drift: a top-down drift racer on a procedurally generated loop.
//!
//! The simulation lives in [`game_logic`] and is fully headless; [`render`]
//! describes each frame as backend-agnostic draw commands. The binary target
//! hosts both inside a Bevy app.

pub mod config;
pub mod game_logic;
pub mod render;
