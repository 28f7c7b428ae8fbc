// src/ui/distance_hud/mod.rs
//
// Distance HUD module showing the meters flown, unaffected by camera scroll.

pub mod components;
pub mod plugin;
pub mod systems;

// Re-export main types
pub use plugin::UiPlugin;
