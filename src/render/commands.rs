use bevy::prelude::*;

use crate::game_logic::rng::SeededRng;

/// Side length of a repeating surface tile, in pixels.
pub const PATTERN_TILE_SIZE: u32 = 100;

/// The three textured road surfaces a frame can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Asphalt,
    Grass,
    Dirt,
}

/// A noisy tile described as data: base color, noise amplitude, and the seed
/// of the noise stream. Whoever rasterizes frames expands this once and
/// reuses the tile; the simulation never builds pixel buffers per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternSpec {
    pub base_rgb: [u8; 3],
    pub noise_amplitude: f32,
    pub tile_size: u32,
    pub seed: u32,
}

impl PatternSpec {
    /// Expand the description into RGBA bytes, row-major. Every pixel shifts
    /// all three channels by the same noise sample, which reads as grain
    /// rather than color speckle.
    pub fn pixels(&self) -> Vec<u8> {
        let mut rng = SeededRng::new(self.seed);
        let count = (self.tile_size * self.tile_size) as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            let noise = rng.next() * self.noise_amplitude - self.noise_amplitude / 2.0;
            for base in self.base_rgb {
                data.push((base as f32 + noise).clamp(0.0, 255.0) as u8);
            }
            data.push(255);
        }
        data
    }

    pub fn base_color(&self) -> Color {
        Color::srgb_u8(self.base_rgb[0], self.base_rgb[1], self.base_rgb[2])
    }
}

/// The tile descriptions for one generated track, drawn from the track's
/// seeded stream so a seed pins the cosmetics too.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePatterns {
    pub asphalt: PatternSpec,
    pub grass: PatternSpec,
    pub dirt: PatternSpec,
}

impl SurfacePatterns {
    pub fn from_stream(rng: &mut SeededRng) -> Self {
        Self {
            asphalt: PatternSpec {
                base_rgb: [51, 51, 51],
                noise_amplitude: 20.0,
                tile_size: PATTERN_TILE_SIZE,
                seed: rng.next_u32(),
            },
            grass: PatternSpec {
                base_rgb: [34, 139, 34],
                noise_amplitude: 30.0,
                tile_size: PATTERN_TILE_SIZE,
                seed: rng.next_u32(),
            },
            dirt: PatternSpec {
                base_rgb: [139, 69, 19],
                noise_amplitude: 40.0,
                tile_size: PATTERN_TILE_SIZE,
                seed: rng.next_u32(),
            },
        }
    }

    pub fn get(&self, surface: Surface) -> &PatternSpec {
        match surface {
            Surface::Asphalt => &self.asphalt,
            Surface::Grass => &self.grass,
            Surface::Dirt => &self.dirt,
        }
    }
}

/// How a stroked line is filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stroke {
    Solid(Color),
    Pattern(Surface),
}

/// One backend-agnostic drawing intent. A frame is an ordered list of these;
/// commands between `SetTransform` and `ResetTransform` are in world space,
/// the rest in screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    SetTransform {
        zoom: f32,
        translate: Vec2,
    },
    ResetTransform,
    FillRect {
        center: Vec2,
        size: Vec2,
        rotation: f32,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        stroke: Stroke,
        dash: Option<[f32; 2]>,
    },
    Text {
        text: String,
        position: Vec2,
        color: Color,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_pixels_are_deterministic() {
        let spec = PatternSpec {
            base_rgb: [51, 51, 51],
            noise_amplitude: 20.0,
            tile_size: 16,
            seed: 777,
        };
        assert_eq!(spec.pixels(), spec.pixels());
    }

    #[test]
    fn test_pattern_pixels_shape_and_alpha() {
        let spec = PatternSpec {
            base_rgb: [34, 139, 34],
            noise_amplitude: 30.0,
            tile_size: 8,
            seed: 1,
        };
        let data = spec.pixels();
        assert_eq!(data.len(), 8 * 8 * 4);
        for pixel in data.chunks(4) {
            assert_eq!(pixel[3], 255);
            // Grain moves all channels in lockstep.
            let dr = pixel[0] as i32 - 34;
            let dg = pixel[1] as i32 - 139;
            assert!((dr - dg).abs() <= 1);
        }
    }

    #[test]
    fn test_surface_patterns_pull_three_seeds() {
        let mut rng = SeededRng::new(5);
        let patterns = SurfacePatterns::from_stream(&mut rng);
        let mut check = SeededRng::new(5);
        assert_eq!(patterns.asphalt.seed, check.next_u32());
        assert_eq!(patterns.grass.seed, check.next_u32());
        assert_eq!(patterns.dirt.seed, check.next_u32());
        assert_ne!(patterns.asphalt.seed, patterns.grass.seed);
    }
}
