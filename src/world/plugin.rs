//! WorldPlugin spawns the flight scene and mirrors the model into camera and sprite transforms.
use bevy::prelude::*;

use crate::flight::FlightSet;
use crate::world::{
    components::Viewport,
    systems::{apply_camera_scroll, scroll_background, spawn_flight_scene, sync_bird_transform},
};

const SKY_COLOR: Color = Color::srgb(0.53, 0.78, 0.92);

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(SKY_COLOR))
            .init_resource::<Viewport>()
            .add_systems(Startup, spawn_flight_scene)
            .add_systems(
                Update,
                (apply_camera_scroll, sync_bird_transform, scroll_background)
                    .in_set(FlightSet::Present),
            );
    }
}
