//! Flight module: tuning, physics body, per-frame motion model, input flag, and telemetry.
pub mod body;
pub mod config;
pub mod input;
pub mod plugin;
pub mod state;
pub mod systems;
pub mod telemetry;

pub use config::FlightConfig;
pub use plugin::FlightPlugin;
pub use state::FlightState;
pub use systems::FlightSet;
