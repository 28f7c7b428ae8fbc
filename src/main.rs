use bevy::{prelude::*, window::WindowResolution};

mod core;
mod flight;
mod ui;
mod world;

use crate::{
    core::CorePlugin,
    flight::FlightPlugin,
    ui::UiPlugin,
    world::{
        components::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH},
        WorldPlugin,
    },
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Skyglide".to_string(),
                    resolution: WindowResolution::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                    resizable: false,
                    ..default()
                }),
                ..default()
            }),
            CorePlugin::default(),
            FlightPlugin,
            WorldPlugin, // After FlightPlugin; the scene spawns from FlightState
            UiPlugin,
        ))
        .run();
}
