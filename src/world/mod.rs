//! World module housing the 2D scene, follow camera, and looping background.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
