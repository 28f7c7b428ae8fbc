//! Components and resources used by the world module.
use bevy::prelude::*;

pub const VIEWPORT_WIDTH: u32 = 800;
pub const VIEWPORT_HEIGHT: u32 = 600;

/// Marker component for the 2D camera that follows the flight model's scroll.
#[derive(Component, Default)]
pub struct FollowCamera;

/// Marker component for the bird sprite.
#[derive(Component, Default)]
pub struct Bird;

/// Horizontally tiled backdrop that loops by its own offset.
#[derive(Component, Debug)]
pub struct ScrollingBackground {
    /// Width of one image tile in world pixels.
    pub tile_width: f32,
}

/// Size of the visible play area in world pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width.max(1.0), height.max(1.0)),
        }
    }

    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH as f32, VIEWPORT_HEIGHT as f32)
    }
}
