use bevy::prelude::*;
use bevy::render::camera::Projection;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::sprite::SpriteImageMode;
use bevy::window::PrimaryWindow;

use daily_drift::config::RaceSettings;
use daily_drift::game_logic::Race;
use daily_drift::render::{compose_frame, DrawCommand, PatternSpec, Stroke, Surface};

/// Marker for everything respawned from the current frame's command list.
#[derive(Component)]
pub struct FrameEntity;

/// Images baked once per run: the three surface tiles plus a white disc used
/// for round joints and markers.
#[derive(Resource)]
pub struct FrameAssets {
    asphalt: Handle<Image>,
    grass: Handle<Image>,
    dirt: Handle<Image>,
    disc: Handle<Image>,
}

/// Expand the track's pattern descriptions into textures. The specs are
/// seed-derived, so a window resize regenerates an identical set and the
/// baked images stay valid.
pub fn build_frame_assets(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    race: Res<Race>,
) {
    let patterns = race.track.patterns();
    commands.insert_resource(FrameAssets {
        asphalt: images.add(pattern_image(&patterns.asphalt)),
        grass: images.add(pattern_image(&patterns.grass)),
        dirt: images.add(pattern_image(&patterns.dirt)),
        disc: images.add(disc_image()),
    });
}

fn pattern_image(spec: &PatternSpec) -> Image {
    Image::new(
        Extent3d {
            width: spec.tile_size,
            height: spec.tile_size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        spec.pixels(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

fn disc_image() -> Image {
    const SIZE: u32 = 64;
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = SIZE as f32 / 2.0;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let distance = Vec2::new(x as f32 - center, y as f32 - center).length();
            let alpha = (radius - distance).clamp(0.0, 1.0);
            data.extend_from_slice(&[255, 255, 255, (alpha * 255.0) as u8]);
        }
    }
    Image::new(
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

/// Rebuild the frame's sprites from the draw-command list. The simulation
/// world uses screen-style coordinates (y down); flip into Bevy's y-up world
/// here and nowhere else.
pub fn render_frame(
    mut commands: Commands,
    race: Res<Race>,
    settings: Res<RaceSettings>,
    assets: Res<FrameAssets>,
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&mut Transform, &mut Projection), With<Camera2d>>,
    previous: Query<Entity, With<FrameEntity>>,
) {
    for entity in previous.iter() {
        commands.entity(entity).despawn();
    }

    let width = window.width();
    let height = window.height();
    let frame = compose_frame(&race, width, height, settings.debug_overlay);

    let (mut camera_transform, mut projection) = camera.into_inner();
    let mut z = 0.0_f32;

    for command in frame {
        z += 0.01;
        match command {
            // The engine clears through `ClearColor`.
            DrawCommand::Clear { .. } => {}
            DrawCommand::SetTransform { zoom, translate } => {
                let view_center = Vec2::new(
                    (width / 2.0 - translate.x) / zoom,
                    (height / 2.0 - translate.y) / zoom,
                );
                camera_transform.translation.x = view_center.x;
                camera_transform.translation.y = -view_center.y;
                if let Projection::Orthographic(ortho) = &mut *projection {
                    ortho.scale = 1.0 / zoom;
                }
            }
            DrawCommand::ResetTransform => {}
            DrawCommand::FillRect {
                center,
                size,
                rotation,
                color,
            } => {
                commands.spawn((
                    Sprite::from_color(color, size),
                    Transform {
                        translation: world_point(center, z),
                        rotation: Quat::from_rotation_z(-rotation),
                        ..default()
                    },
                    FrameEntity,
                ));
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                commands.spawn((
                    Sprite {
                        image: assets.disc.clone(),
                        color,
                        custom_size: Some(Vec2::splat(radius * 2.0)),
                        ..default()
                    },
                    Transform::from_translation(world_point(center, z)),
                    FrameEntity,
                ));
            }
            DrawCommand::StrokeLine {
                from,
                to,
                width: line_width,
                stroke,
                dash,
            } => match dash {
                Some(pattern) => {
                    spawn_dashed_line(&mut commands, from, to, line_width, &stroke, pattern, z)
                }
                None => spawn_line(&mut commands, &assets, from, to, line_width, &stroke, z),
            },
            DrawCommand::Text {
                text,
                position,
                color,
            } => {
                commands.spawn((
                    Text::new(text),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(color),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(position.x),
                        top: Val::Px(position.y - 12.0),
                        ..default()
                    },
                    FrameEntity,
                ));
            }
        }
    }
}

fn world_point(point: Vec2, z: f32) -> Vec3 {
    Vec3::new(point.x, -point.y, z)
}

fn line_transform(from: Vec2, to: Vec2, z: f32) -> (Transform, f32) {
    let mid = (from + to) / 2.0;
    let delta = to - from;
    let length = delta.length();
    let angle = (-delta.y).atan2(delta.x);
    (
        Transform {
            translation: world_point(mid, z),
            rotation: Quat::from_rotation_z(angle),
            ..default()
        },
        length,
    )
}

fn spawn_line(
    commands: &mut Commands,
    assets: &FrameAssets,
    from: Vec2,
    to: Vec2,
    width: f32,
    stroke: &Stroke,
    z: f32,
) {
    let (transform, length) = line_transform(from, to, z);
    let size = Vec2::new(length, width);
    let sprite = match stroke {
        Stroke::Solid(color) => Sprite::from_color(*color, size),
        Stroke::Pattern(surface) => {
            let image = match surface {
                Surface::Asphalt => assets.asphalt.clone(),
                Surface::Grass => assets.grass.clone(),
                Surface::Dirt => assets.dirt.clone(),
            };
            Sprite {
                image,
                custom_size: Some(size),
                image_mode: SpriteImageMode::Tiled {
                    tile_x: true,
                    tile_y: true,
                    stretch_value: 1.0,
                },
                ..default()
            }
        }
    };
    commands.spawn((sprite, transform, FrameEntity));
}

/// Dashes are host-side: chop the line into on/off runs of solid sprites.
fn spawn_dashed_line(
    commands: &mut Commands,
    from: Vec2,
    to: Vec2,
    width: f32,
    stroke: &Stroke,
    pattern: [f32; 2],
    z: f32,
) {
    let color = match stroke {
        Stroke::Solid(color) => *color,
        Stroke::Pattern(_) => Color::WHITE,
    };
    let delta = to - from;
    let length = delta.length();
    if length == 0.0 || pattern[0] <= 0.0 {
        return;
    }
    let direction = delta / length;
    let mut travelled = 0.0;
    while travelled < length {
        let run = pattern[0].min(length - travelled);
        let start = from + direction * travelled;
        let end = from + direction * (travelled + run);
        let (transform, run_length) = line_transform(start, end, z);
        commands.spawn((
            Sprite::from_color(color, Vec2::new(run_length, width)),
            transform,
            FrameEntity,
        ));
        travelled += pattern[0] + pattern[1];
    }
}
