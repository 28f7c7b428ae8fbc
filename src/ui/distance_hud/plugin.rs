// src/ui/distance_hud/plugin.rs
//
// UiPlugin coordinates the distance HUD systems and resources.

use bevy::prelude::*;

use super::components::{DistanceHudSettings, DistanceHudTracker};
use super::systems::{spawn_distance_hud, update_distance_hud};
use crate::flight::FlightSet;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(DistanceHudSettings::default())
            .insert_resource(DistanceHudTracker::default())
            .add_systems(Startup, spawn_distance_hud)
            .add_systems(Update, update_distance_hud.in_set(FlightSet::Present));
    }
}
