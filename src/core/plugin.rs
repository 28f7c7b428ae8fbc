//! CorePlugin wires the frame clock and global logging for the flight simulation.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
/// Largest step handed to the simulation; keeps the first frame from spiking.
pub const DEFAULT_MAX_DELTA_SECONDS: f32 = 1.0 / 60.0;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Tracks scaled, clamped simulation time derived from real frame deltas.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    max_delta: Duration,
    last_real_delta: Duration,
    last_scaled_delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl SimulationClock {
    /// Creates a new clock with the provided time-scale multiplier and the default step cap.
    pub fn new(time_scale: f32) -> Self {
        Self::with_max_delta(time_scale, DEFAULT_MAX_DELTA_SECONDS)
    }

    /// Creates a clock whose scaled step never exceeds `max_delta_seconds`.
    pub fn with_max_delta(time_scale: f32, max_delta_seconds: f32) -> Self {
        let max_delta_seconds = if max_delta_seconds.is_finite() && max_delta_seconds > 0.0 {
            max_delta_seconds
        } else {
            DEFAULT_MAX_DELTA_SECONDS
        };
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            max_delta: Duration::from_secs_f32(max_delta_seconds),
            last_real_delta: Duration::ZERO,
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Sets the time-scale multiplier (clamped to a small positive minimum).
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    /// Returns the current time-scale multiplier.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Last real (unscaled) delta reported by Bevy's Time resource.
    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Last scaled delta after applying the multiplier and the step cap.
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    /// Step size in seconds for the current frame.
    pub fn delta_secs(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    /// Returns the total scaled duration elapsed since the clock was initialised.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Applies a real delta to the clock, storing both the real and the scaled, capped durations.
    pub fn tick(&mut self, real_delta: Duration) {
        self.last_real_delta = real_delta;
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale).min(self.max_delta);
        self.elapsed += self.last_scaled_delta;
        self.frame_count = self.frame_count.saturating_add(1);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers simulation timing systems and resources.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
    max_delta_seconds: f32,
}

impl CorePlugin {
    /// Creates a CorePlugin with the provided time-scale multiplier.
    #[allow(dead_code)]
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self {
            time_scale,
            max_delta_seconds: DEFAULT_MAX_DELTA_SECONDS,
        }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            max_delta_seconds: DEFAULT_MAX_DELTA_SECONDS,
        }
    }
}

/// System set covering the clock tick; every simulation system runs after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClockTick;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::with_max_delta(
            self.time_scale,
            self.max_delta_seconds,
        ))
        .add_systems(Startup, log_startup_time_scale)
        .add_systems(Update, update_simulation_clock.in_set(ClockTick));

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_scaled_ticks.after(ClockTick));
        }
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}, max step: {:.4}s",
        clock.time_scale(),
        clock.max_delta().as_secs_f32()
    );
}

#[cfg(feature = "core_debug")]
fn log_scaled_ticks(mut timer: ResMut<DebugTickTimer>, clock: Res<SimulationClock>) {
    if timer.timer.tick(clock.last_scaled_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Sim elapsed: {:.2}s | frames: {} | scale: {:.3} | real dt: {:.4}s | scaled dt: {:.4}s",
            clock.elapsed().as_secs_f32(),
            clock.frame_count(),
            clock.time_scale(),
            clock.last_real_delta().as_secs_f32(),
            clock.last_scaled_delta().as_secs_f32(),
        );
    }
}
