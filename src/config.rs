use bevy::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Optional run settings, read from a JSON file next to the binary. Every
/// field has a sensible default so the file can be absent, partial, or
/// malformed without stopping a race from starting.
#[derive(Resource, Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RaceSettings {
    /// Fixed track seed. When unset the host derives one from the clock,
    /// matching a fresh track per launch.
    pub seed: Option<u32>,
    /// Fixed race direction. When unset the host flips a coin.
    pub clockwise: Option<bool>,
    /// Draw the nearest-segment probe each frame.
    pub debug_overlay: bool,
}

impl RaceSettings {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(_) => return Self::default(),
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("ignoring malformed settings {}: {err}", path.display());
                Self::default()
            }
        }
    }
}
