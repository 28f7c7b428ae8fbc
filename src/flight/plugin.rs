//! FlightPlugin wires the flight model resources and the per-frame pipeline.
use bevy::prelude::*;

use crate::core::ClockTick;
use crate::flight::{
    config::FlightConfig,
    input::ThrustInput,
    state::FlightState,
    systems::{read_thrust_input, step_flight_model, FlightSet, LastFrameReport},
    telemetry::{
        flush_flight_telemetry_log, record_flight_telemetry, FlightTelemetry, FlightTelemetryLog,
    },
};

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        let config = FlightConfig::load_or_default();
        info!(
            "Flight configured: gravity {:.0}/{:.0} (thrust/glide), thrust {:.0}, forward {:.0}..{:.0}, bounds x {:.0}..{:.0} height {:.0}",
            config.physics.gravity,
            config.physics.glide_gravity,
            config.physics.thrust,
            config.forward.base_speed,
            config.forward.max_speed,
            config.bounds.min_x,
            config.bounds.max_x,
            config.bounds.height
        );

        app.insert_resource(FlightState::new(&config))
            .insert_resource(FlightTelemetry::from_config(&config))
            .init_resource::<ThrustInput>()
            .init_resource::<LastFrameReport>()
            .configure_sets(
                Update,
                (FlightSet::Input, FlightSet::Step, FlightSet::Present)
                    .chain()
                    .after(ClockTick),
            )
            .add_systems(
                Update,
                (
                    read_thrust_input.in_set(FlightSet::Input),
                    step_flight_model.in_set(FlightSet::Step),
                    record_flight_telemetry.in_set(FlightSet::Present),
                ),
            );

        if config.telemetry.enabled {
            info!(
                "Flight telemetry logging to {} every {:.2}s",
                config.telemetry.log_path, config.telemetry.sample_interval_seconds
            );
            app.insert_resource(FlightTelemetryLog::new(config.telemetry.log_path.clone()))
                .add_systems(
                    Last,
                    flush_flight_telemetry_log.run_if(resource_exists::<FlightTelemetryLog>),
                );
        }

        #[cfg(feature = "flight_debug")]
        {
            app.init_resource::<crate::flight::systems::FlightDebugTimer>()
                .add_systems(
                    Update,
                    crate::flight::systems::log_flight_summary.in_set(FlightSet::Present),
                );
        }

        app.insert_resource(config);
    }
}
