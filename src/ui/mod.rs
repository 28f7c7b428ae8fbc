// src/ui/mod.rs
//
// UI module providing screen-space HUD elements.
//
// Current features:
// - Distance counter (top-left, fixed to the viewport)

pub mod distance_hud;

// Re-export the main plugin
pub use distance_hud::UiPlugin;
