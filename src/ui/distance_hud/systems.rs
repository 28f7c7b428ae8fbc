// src/ui/distance_hud/systems.rs
//
// Systems for spawning and refreshing the distance counter.

use bevy::prelude::*;

use crate::flight::{FlightConfig, FlightState};

use super::components::{DistanceHudSettings, DistanceHudTracker, DistanceText};

// Visual constants
const TEXT_COLOR: Color = Color::WHITE;

/// Text shown by the HUD for a given distance.
pub fn format_distance(distance: u64) -> String {
    format!("Distance: {}m", distance)
}

/// Spawn the HUD text. UI nodes are laid out in screen space, so camera scroll never moves it.
pub fn spawn_distance_hud(mut commands: Commands, settings: Res<DistanceHudSettings>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(settings.top_offset),
            left: Val::Px(settings.left_offset),
            ..default()
        },
        Text::new(format_distance(0)),
        TextFont {
            font_size: settings.font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
        DistanceText,
        Name::new("Distance HUD"),
    ));
}

/// Rewrite the counter when the whole-meter distance changes.
pub fn update_distance_hud(
    state: Res<FlightState>,
    config: Res<FlightConfig>,
    mut tracker: ResMut<DistanceHudTracker>,
    mut texts: Query<&mut Text, With<DistanceText>>,
) {
    let distance = state.distance(&config.world);
    if tracker.shown_distance == Some(distance) {
        return;
    }

    for mut text in texts.iter_mut() {
        text.0 = format_distance(distance);
    }
    tracker.shown_distance = Some(distance);
}
