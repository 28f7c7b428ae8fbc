//! Systems for the world module.
use bevy::{prelude::*, sprite::SpriteImageMode};

use crate::flight::FlightState;
use crate::world::components::{Bird, FollowCamera, ScrollingBackground, Viewport};

const BACKGROUND_IMAGE: &str = "background.png";
const BACKGROUND_TILE_WIDTH: f32 = 512.0;
const BIRD_SIZE: Vec2 = Vec2::new(34.0, 24.0);
const BIRD_COLOR: Color = Color::srgb(0.95, 0.78, 0.2);

const BACKGROUND_Z: f32 = -10.0;
const BIRD_Z: f32 = 1.0;

/// Bevy translation for a point given in scroll-space (`+y` down, origin at the top-left of the scrolled view).
pub fn screen_to_world(scroll_x: f32, point: Vec2, z: f32) -> Vec3 {
    Vec3::new(scroll_x + point.x, -point.y, z)
}

/// Camera centre for a view whose left edge sits at `scroll_x`.
pub fn camera_translation(scroll_x: f32, viewport: &Viewport) -> Vec3 {
    let half = viewport.half();
    Vec3::new(scroll_x + half.x, -half.y, 0.0)
}

/// Horizontal tile offset folded into `[0, tile_width)`.
pub fn background_phase(background_offset: f32, tile_width: f32) -> f32 {
    if tile_width <= 0.0 || !background_offset.is_finite() {
        return 0.0;
    }
    background_offset.rem_euclid(tile_width)
}

/// Centre of a backdrop one tile wider than the view, shifted left by the current phase.
pub fn background_translation(
    scroll_x: f32,
    background_offset: f32,
    tile_width: f32,
    viewport: &Viewport,
) -> Vec3 {
    let span = viewport.size.x + tile_width;
    let left = scroll_x - background_phase(background_offset, tile_width);
    Vec3::new(left + span * 0.5, -viewport.half().y, BACKGROUND_Z)
}

/// Spawns the 2D scene: follow camera, tiled background, and the bird.
pub fn spawn_flight_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    viewport: Res<Viewport>,
    state: Res<FlightState>,
) {
    commands.spawn((
        Camera2d,
        Transform::from_translation(camera_translation(state.camera_scroll_x(), &viewport)),
        FollowCamera,
        Name::new("Follow Camera"),
    ));

    commands.spawn((
        Sprite {
            image: asset_server.load(BACKGROUND_IMAGE),
            custom_size: Some(Vec2::new(
                viewport.size.x + BACKGROUND_TILE_WIDTH,
                viewport.size.y,
            )),
            image_mode: SpriteImageMode::Tiled {
                tile_x: true,
                tile_y: false,
                stretch_value: 1.0,
            },
            ..default()
        },
        Transform::from_translation(background_translation(
            state.camera_scroll_x(),
            state.background_offset(),
            BACKGROUND_TILE_WIDTH,
            &viewport,
        )),
        ScrollingBackground {
            tile_width: BACKGROUND_TILE_WIDTH,
        },
        Name::new("Scrolling Background"),
    ));

    commands.spawn((
        Sprite::from_color(BIRD_COLOR, BIRD_SIZE),
        Transform::from_translation(screen_to_world(
            state.camera_scroll_x(),
            state.position(),
            BIRD_Z,
        )),
        Bird,
        Name::new("Bird"),
    ));

    info!(
        "Flight scene spawned ({}x{} viewport)",
        viewport.size.x, viewport.size.y
    );
}

/// Moves the camera to the model's smoothed scroll position.
pub fn apply_camera_scroll(
    state: Res<FlightState>,
    viewport: Res<Viewport>,
    mut cameras: Query<&mut Transform, With<FollowCamera>>,
) {
    let translation = camera_translation(state.camera_scroll_x(), &viewport);
    for mut transform in cameras.iter_mut() {
        transform.translation = translation;
    }
}

/// Keeps the bird sprite at its model position inside the scrolled view.
pub fn sync_bird_transform(
    state: Res<FlightState>,
    mut birds: Query<&mut Transform, (With<Bird>, Without<FollowCamera>)>,
) {
    let translation = screen_to_world(state.camera_scroll_x(), state.position(), BIRD_Z);
    for mut transform in birds.iter_mut() {
        transform.translation = translation;
    }
}

/// Hands the background accumulator to the tiled backdrop.
pub fn scroll_background(
    state: Res<FlightState>,
    viewport: Res<Viewport>,
    mut backgrounds: Query<
        (&ScrollingBackground, &mut Transform),
        (Without<Bird>, Without<FollowCamera>),
    >,
) {
    for (background, mut transform) in backgrounds.iter_mut() {
        transform.translation = background_translation(
            state.camera_scroll_x(),
            state.background_offset(),
            background.tile_width,
            &viewport,
        );
    }
}
