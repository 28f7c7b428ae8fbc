//! Tuning surface for the flight model, loaded from `config/flight.toml`.
use std::{fmt, fs, io, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/flight.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawFlightConfig {
    #[serde(default)]
    physics: RawPhysics,
    #[serde(default)]
    forward: RawForward,
    #[serde(default)]
    bounds: RawBounds,
    #[serde(default)]
    camera: RawCamera,
    #[serde(default)]
    world: RawWorld,
    #[serde(default)]
    background: RawBackground,
    #[serde(default)]
    telemetry: RawTelemetry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPhysics {
    gravity: f32,
    glide_gravity: f32,
    thrust: f32,
    drag: f32,
    max_velocity_y: f32,
}

impl Default for RawPhysics {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            glide_gravity: 400.0,
            thrust: -500.0,
            drag: 1.0,
            max_velocity_y: 600.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawForward {
    base_speed: f32,
    max_speed: f32,
    thrust_boost: f32,
    fall_threshold: f32,
    fall_deceleration: f32,
    glide_maintain: f32,
}

impl Default for RawForward {
    fn default() -> Self {
        Self {
            base_speed: 70.0,
            max_speed: 200.0,
            thrust_boost: 20.0,
            fall_threshold: 300.0,
            fall_deceleration: 0.95,
            glide_maintain: 0.99,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawBounds {
    min_x: f32,
    max_x: f32,
    height: f32,
    spawn_x: f32,
    spawn_y: f32,
}

impl Default for RawBounds {
    fn default() -> Self {
        Self {
            min_x: 200.0,
            max_x: 400.0,
            height: 600.0,
            spawn_x: 200.0,
            spawn_y: 300.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCamera {
    lead_factor: f32,
    lerp: f32,
}

impl Default for RawCamera {
    fn default() -> Self {
        Self {
            lead_factor: 0.2,
            lerp: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawWorld {
    scroll_factor: f32,
    units_per_meter: f32,
}

impl Default for RawWorld {
    fn default() -> Self {
        Self {
            scroll_factor: 1.0,
            units_per_meter: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawBackground {
    scroll_speed: f32,
}

impl Default for RawBackground {
    fn default() -> Self {
        Self { scroll_speed: 60.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTelemetry {
    enabled: bool,
    sample_interval_seconds: f32,
    capacity: usize,
    log_path: String,
}

impl Default for RawTelemetry {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_interval_seconds: 0.5,
            capacity: 120,
            log_path: "logs/flight_history.jsonl".to_string(),
        }
    }
}

/// Runtime configuration derived from `config/flight.toml`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FlightConfig {
    pub physics: PhysicsTuning,
    pub forward: ForwardTuning,
    pub bounds: FlightBounds,
    pub camera: CameraTuning,
    pub world: WorldTuning,
    pub background: BackgroundTuning,
    pub telemetry: TelemetrySettings,
}

/// Vertical forces and body damping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsTuning {
    /// Downward acceleration while thrusting (px/s²).
    pub gravity: f32,
    /// Downward acceleration while gliding (px/s²), lower than `gravity`.
    pub glide_gravity: f32,
    /// Vertical velocity written on every thrusting frame (negative = up).
    pub thrust: f32,
    /// Fraction of velocity retained per second; 1.0 disables drag.
    pub drag: f32,
    pub max_velocity_y: f32,
}

/// Forward-speed dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardTuning {
    pub base_speed: f32,
    pub max_speed: f32,
    /// Linear gain per second while thrusting.
    pub thrust_boost: f32,
    /// Downward speed above which the bird counts as falling badly.
    pub fall_threshold: f32,
    /// Per-frame multiplier while falling badly.
    pub fall_deceleration: f32,
    /// Per-frame multiplier while gliding.
    pub glide_maintain: f32,
}

/// Position limits for the bird plus its spawn point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub height: f32,
    pub spawn: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTuning {
    /// Share of the world offset the camera targets.
    pub lead_factor: f32,
    /// Per-frame catch-up fraction towards the target.
    pub lerp: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTuning {
    pub scroll_factor: f32,
    /// World pixels per displayed meter.
    pub units_per_meter: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundTuning {
    /// Constant tile-offset rate (px/s), independent of forward speed.
    pub scroll_speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub sample_interval_seconds: f32,
    pub capacity: usize,
    pub log_path: String,
}

/// Reasons a flight config file could not be used.
#[derive(Debug)]
pub enum FlightConfigError {
    Read(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for FlightConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "read failure: {}", err),
            Self::Parse(err) => write!(f, "parse failure: {}", err),
        }
    }
}

impl std::error::Error for FlightConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for FlightConfigError {
    fn from(value: io::Error) -> Self {
        Self::Read(value)
    }
}

impl From<toml::de::Error> for FlightConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl FlightConfig {
    pub fn load_or_default() -> Self {
        match Self::load_from(Path::new(CONFIG_PATH)) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "Failed to load {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, FlightConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, FlightConfigError> {
        let raw = toml::from_str::<RawFlightConfig>(data)?;
        Ok(raw.into())
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        RawFlightConfig::default().into()
    }
}

impl From<RawFlightConfig> for FlightConfig {
    fn from(value: RawFlightConfig) -> Self {
        let physics_defaults = RawPhysics::default();
        let physics = PhysicsTuning {
            gravity: finite_or(value.physics.gravity, physics_defaults.gravity).max(0.0),
            glide_gravity: finite_or(value.physics.glide_gravity, physics_defaults.glide_gravity)
                .max(0.0),
            thrust: finite_or(value.physics.thrust, physics_defaults.thrust),
            drag: sanitise_factor(value.physics.drag),
            max_velocity_y: finite_or(value.physics.max_velocity_y, physics_defaults.max_velocity_y)
                .abs()
                .max(f32::EPSILON),
        };

        let forward_defaults = RawForward::default();
        let base_speed = finite_or(value.forward.base_speed, forward_defaults.base_speed).max(0.0);
        let forward = ForwardTuning {
            base_speed,
            max_speed: finite_or(value.forward.max_speed, forward_defaults.max_speed)
                .max(base_speed),
            thrust_boost: finite_or(value.forward.thrust_boost, forward_defaults.thrust_boost)
                .max(0.0),
            fall_threshold: finite_or(value.forward.fall_threshold, forward_defaults.fall_threshold),
            fall_deceleration: sanitise_factor(value.forward.fall_deceleration),
            glide_maintain: sanitise_factor(value.forward.glide_maintain),
        };

        let bounds_defaults = RawBounds::default();
        let raw_min_x = finite_or(value.bounds.min_x, bounds_defaults.min_x);
        let raw_max_x = finite_or(value.bounds.max_x, bounds_defaults.max_x);
        let min_x = raw_min_x.min(raw_max_x);
        let max_x = raw_max_x.max(raw_min_x);
        let height = finite_or(value.bounds.height, bounds_defaults.height).max(1.0);
        let bounds = FlightBounds {
            min_x,
            max_x,
            height,
            spawn: Vec2::new(
                finite_or(value.bounds.spawn_x, bounds_defaults.spawn_x).clamp(min_x, max_x),
                finite_or(value.bounds.spawn_y, bounds_defaults.spawn_y).clamp(0.0, height),
            ),
        };

        let camera_defaults = RawCamera::default();
        let camera = CameraTuning {
            lead_factor: finite_or(value.camera.lead_factor, camera_defaults.lead_factor).max(0.0),
            lerp: finite_or(value.camera.lerp, camera_defaults.lerp).clamp(0.0, 1.0),
        };

        let world_defaults = RawWorld::default();
        let world = WorldTuning {
            scroll_factor: finite_or(value.world.scroll_factor, world_defaults.scroll_factor)
                .max(0.0),
            units_per_meter: finite_or(value.world.units_per_meter, world_defaults.units_per_meter)
                .max(f32::EPSILON),
        };

        let background = BackgroundTuning {
            scroll_speed: finite_or(
                value.background.scroll_speed,
                RawBackground::default().scroll_speed,
            )
            .max(0.0),
        };

        let telemetry = TelemetrySettings {
            enabled: value.telemetry.enabled,
            sample_interval_seconds: finite_or(
                value.telemetry.sample_interval_seconds,
                RawTelemetry::default().sample_interval_seconds,
            )
            .max(0.01),
            capacity: value.telemetry.capacity.max(1),
            log_path: value.telemetry.log_path.trim().to_string(),
        };

        Self {
            physics,
            forward,
            bounds,
            camera,
            world,
            background,
            telemetry,
        }
    }
}

/// Replaces NaN and infinities with the built-in default for that key.
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Keeps multiplicative decay factors inside `(0, 1]`.
fn sanitise_factor(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(f32::EPSILON, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = FlightConfig::default();
        assert_eq!(config.physics.thrust, -500.0);
        assert!(config.physics.glide_gravity < config.physics.gravity);
        assert_eq!(config.forward.base_speed, 70.0);
        assert_eq!(config.forward.fall_threshold, 300.0);
        assert_eq!(config.forward.fall_deceleration, 0.95);
        assert_eq!(config.forward.glide_maintain, 0.99);
        assert_eq!(config.bounds.min_x, 200.0);
        assert_eq!(config.camera.lead_factor, 0.2);
        assert_eq!(config.world.units_per_meter, 10.0);
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = FlightConfig::from_toml_str(
            r#"
            [physics]
            gravity = 1200.0

            [background]
            scroll_speed = 90.0
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.physics.gravity, 1200.0);
        assert_eq!(config.physics.glide_gravity, 400.0);
        assert_eq!(config.background.scroll_speed, 90.0);
        assert_eq!(config.forward.max_speed, 200.0);
    }

    #[test]
    fn inverted_ranges_are_repaired() {
        let config = FlightConfig::from_toml_str(
            r#"
            [forward]
            base_speed = 150.0
            max_speed = 90.0
            fall_deceleration = 3.0

            [bounds]
            min_x = 500.0
            max_x = 100.0
            spawn_x = 9000.0
            spawn_y = -20.0

            [camera]
            lerp = 4.0
            "#,
        )
        .expect("config should parse");

        assert!(config.forward.base_speed <= config.forward.max_speed);
        assert_eq!(config.forward.fall_deceleration, 1.0);
        assert!(config.bounds.min_x <= config.bounds.max_x);
        assert_eq!(config.bounds.spawn, Vec2::new(500.0, 0.0));
        assert_eq!(config.camera.lerp, 1.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let config = FlightConfig::from_toml_str(
            r#"
            [physics]
            gravity = -inf
            thrust = nan
            max_velocity_y = inf

            [forward]
            base_speed = inf
            max_speed = nan
            fall_threshold = -inf

            [bounds]
            max_x = inf
            height = nan
            spawn_y = nan

            [camera]
            lerp = nan

            [world]
            units_per_meter = inf
            "#,
        )
        .expect("non-finite floats are valid toml");

        assert_eq!(config.physics.gravity, 1000.0);
        assert_eq!(config.physics.thrust, -500.0);
        assert_eq!(config.physics.max_velocity_y, 600.0);
        assert_eq!(config.forward.base_speed, 70.0);
        assert_eq!(config.forward.max_speed, 200.0);
        assert_eq!(config.forward.fall_threshold, 300.0);
        assert_eq!(config.bounds.max_x, 400.0);
        assert_eq!(config.bounds.height, 600.0);
        assert_eq!(config.bounds.spawn, Vec2::new(200.0, 300.0));
        assert_eq!(config.camera.lerp, 0.1);
        assert_eq!(config.world.units_per_meter, 10.0);

        let mut state = crate::flight::FlightState::new(&config);
        for frame in 0..120 {
            state.step(1.0 / 60.0, frame % 3 == 0, &config);
        }
        let position = state.position();
        assert!(position.is_finite());
        assert!(position.y >= 0.0 && position.y <= config.bounds.height);
        assert!(state.camera_scroll_x().is_finite());
        assert!(state.world_offset().is_finite());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = FlightConfig::from_toml_str("[physics\ngravity = ")
            .expect_err("broken toml must fail");
        assert!(matches!(err, FlightConfigError::Parse(_)));
        assert!(err.to_string().starts_with("parse failure"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = FlightConfig::load_from(Path::new("config/does-not-exist.toml"))
            .expect_err("missing file must fail");
        assert!(matches!(err, FlightConfigError::Read(_)));
    }
}
