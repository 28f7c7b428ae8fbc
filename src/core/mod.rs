//! Core module exposes the simulation clock shared by every plugin.
pub mod plugin;

pub use plugin::{ClockTick, CorePlugin, SimulationClock};
