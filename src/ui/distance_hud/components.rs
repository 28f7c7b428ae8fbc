// src/ui/distance_hud/components.rs
//
// Components and resources for the distance HUD.

use bevy::prelude::*;

/// Marker for the text entity that shows the distance.
#[derive(Component, Debug)]
pub struct DistanceText;

/// Tracks what the HUD last displayed so text is rewritten only on change.
#[derive(Resource, Debug, Default)]
pub struct DistanceHudTracker {
    pub shown_distance: Option<u64>,
}

/// Resource containing layout settings for the HUD.
#[derive(Resource, Debug)]
pub struct DistanceHudSettings {
    /// Offset from the top edge (pixels).
    pub top_offset: f32,

    /// Offset from the left edge (pixels).
    pub left_offset: f32,

    /// Font size for the counter (points).
    pub font_size: f32,
}

impl Default for DistanceHudSettings {
    fn default() -> Self {
        Self {
            top_offset: 16.0,
            left_offset: 16.0,
            font_size: 24.0,
        }
    }
}
