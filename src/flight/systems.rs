//! Systems reading thrust input and advancing the flight model each frame.
use bevy::{
    ecs::message::MessageReader,
    input::{
        keyboard::KeyboardInput,
        mouse::MouseButtonInput,
        touch::{TouchInput, TouchPhase},
        ButtonState,
    },
    log::debug,
    prelude::*,
};

use crate::core::SimulationClock;
use crate::flight::{
    config::FlightConfig,
    input::{PointerEvent, PointerSource, ThrustInput},
    state::{FlightState, FrameReport},
};

/// Ordering of the flight pipeline inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightSet {
    Input,
    Step,
    /// Systems that only read the stepped state (camera, sprites, HUD, telemetry).
    Present,
}

/// Report from the most recent flight step.
#[derive(Resource, Debug, Default)]
pub struct LastFrameReport {
    report: Option<FrameReport>,
    steps: u64,
}

impl LastFrameReport {
    pub fn get(&self) -> Option<&FrameReport> {
        self.report.as_ref()
    }

    #[cfg_attr(not(any(test, feature = "flight_debug")), allow(dead_code))]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn record(&mut self, report: FrameReport) {
        self.report = Some(report);
        self.steps = self.steps.saturating_add(1);
    }
}

fn edge(source: PointerSource, state: ButtonState) -> PointerEvent {
    match state {
        ButtonState::Pressed => PointerEvent::Down(source),
        ButtonState::Released => PointerEvent::Up(source),
    }
}

pub fn pointer_event_for_button(button: MouseButton, state: ButtonState) -> Option<PointerEvent> {
    if button != MouseButton::Left {
        return None;
    }
    Some(edge(PointerSource::Mouse, state))
}

pub fn pointer_event_for_touch(id: u64, phase: TouchPhase) -> Option<PointerEvent> {
    let source = PointerSource::Touch(id);
    match phase {
        TouchPhase::Started => Some(PointerEvent::Down(source)),
        TouchPhase::Ended | TouchPhase::Canceled => Some(PointerEvent::Up(source)),
        TouchPhase::Moved => None,
    }
}

/// Space doubles as a pointer on desktop; auto-repeat presses are ignored.
pub fn pointer_event_for_key(key: KeyCode, state: ButtonState, repeat: bool) -> Option<PointerEvent> {
    if key != KeyCode::Space || repeat {
        return None;
    }
    Some(edge(PointerSource::Keyboard, state))
}

/// Collapses mouse, touch, and keyboard edges into the single thrust flag.
pub fn read_thrust_input(
    mut mouse_buttons: MessageReader<MouseButtonInput>,
    mut touches: MessageReader<TouchInput>,
    mut keys: MessageReader<KeyboardInput>,
    mut input: ResMut<ThrustInput>,
) {
    let mouse_events = mouse_buttons
        .read()
        .filter_map(|ev| pointer_event_for_button(ev.button, ev.state));
    let touch_events = touches
        .read()
        .filter_map(|ev| pointer_event_for_touch(ev.id, ev.phase));
    let key_events = keys
        .read()
        .filter_map(|ev| pointer_event_for_key(ev.key_code, ev.state, ev.repeat));

    let changed = input.apply_all(mouse_events.chain(touch_events).chain(key_events));
    if changed {
        debug!(
            "Thrust input {} ({} sources held)",
            if input.is_thrusting() { "engaged" } else { "released" },
            input.held_count()
        );
    }
}

/// Advances the flight model by the clamped simulation delta.
pub fn step_flight_model(
    clock: Res<SimulationClock>,
    config: Res<FlightConfig>,
    input: Res<ThrustInput>,
    mut state: ResMut<FlightState>,
    mut last_report: ResMut<LastFrameReport>,
) {
    let previous_distance = last_report.get().map(|report| report.distance);
    let report = state.step(clock.delta_secs(), input.is_thrusting(), &config);

    if report.bounds_hit.any()
        && last_report
            .get()
            .is_none_or(|previous| previous.bounds_hit != report.bounds_hit)
    {
        debug!("Bird reached flight bounds: {:?}", report.bounds_hit);
    }
    if previous_distance.is_some_and(|distance| report.distance / 100 > distance / 100) {
        info!("Distance milestone: {}m", report.distance);
    }

    last_report.record(report);
}

#[cfg(feature = "flight_debug")]
#[derive(Resource)]
pub struct FlightDebugTimer {
    timer: Timer,
}

#[cfg(feature = "flight_debug")]
impl Default for FlightDebugTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

#[cfg(feature = "flight_debug")]
pub fn log_flight_summary(
    mut timer: ResMut<FlightDebugTimer>,
    clock: Res<SimulationClock>,
    state: Res<FlightState>,
    last_report: Res<LastFrameReport>,
) {
    if !timer.timer.tick(clock.last_scaled_delta()).just_finished() {
        return;
    }
    let Some(report) = last_report.get() else {
        return;
    };
    let position = state.position();
    info!(
        target: "flight_debug",
        "step {} | pos ({:.1}, {:.1}) | vy {:.1} | fwd {:.2} ({}) | g {:.0} | world {:.1} | cam {:.1} | bg {:.1}",
        last_report.steps(),
        position.x,
        position.y,
        state.velocity_y(),
        state.forward_velocity(),
        report.forward_mode.label(),
        report.gravity,
        state.world_offset(),
        state.camera_scroll_x(),
        state.background_offset(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn only_left_button_maps_to_pointer() {
        assert_eq!(
            pointer_event_for_button(MouseButton::Left, ButtonState::Pressed),
            Some(PointerEvent::Down(PointerSource::Mouse))
        );
        assert_eq!(
            pointer_event_for_button(MouseButton::Left, ButtonState::Released),
            Some(PointerEvent::Up(PointerSource::Mouse))
        );
        assert_eq!(
            pointer_event_for_button(MouseButton::Right, ButtonState::Pressed),
            None
        );
    }

    #[test]
    fn touch_phases_map_to_edges() {
        assert_eq!(
            pointer_event_for_touch(3, TouchPhase::Started),
            Some(PointerEvent::Down(PointerSource::Touch(3)))
        );
        assert_eq!(
            pointer_event_for_touch(3, TouchPhase::Ended),
            Some(PointerEvent::Up(PointerSource::Touch(3)))
        );
        assert_eq!(
            pointer_event_for_touch(5, TouchPhase::Canceled),
            Some(PointerEvent::Up(PointerSource::Touch(5)))
        );
        assert_eq!(pointer_event_for_touch(3, TouchPhase::Moved), None);
    }

    #[test]
    fn space_maps_but_repeats_do_not() {
        assert_eq!(
            pointer_event_for_key(KeyCode::Space, ButtonState::Pressed, false),
            Some(PointerEvent::Down(PointerSource::Keyboard))
        );
        assert_eq!(
            pointer_event_for_key(KeyCode::Space, ButtonState::Pressed, true),
            None
        );
        assert_eq!(
            pointer_event_for_key(KeyCode::KeyA, ButtonState::Pressed, false),
            None
        );
    }

    #[test]
    fn lifting_one_of_two_touches_keeps_thrust() {
        let mut input = ThrustInput::default();
        let edges = [
            (1, TouchPhase::Started),
            (2, TouchPhase::Started),
            (2, TouchPhase::Moved),
            (1, TouchPhase::Ended),
        ];
        input.apply_all(
            edges
                .into_iter()
                .filter_map(|(id, phase)| pointer_event_for_touch(id, phase)),
        );
        assert!(input.is_thrusting());

        input.apply_all(pointer_event_for_touch(2, TouchPhase::Canceled));
        assert!(!input.is_thrusting());
    }

    fn flight_app() -> App {
        let config = FlightConfig::default();
        let mut app = App::new();
        app.insert_resource(SimulationClock::default())
            .insert_resource(FlightState::new(&config))
            .insert_resource(config)
            .init_resource::<ThrustInput>()
            .init_resource::<LastFrameReport>()
            .add_systems(Update, step_flight_model);
        app
    }

    fn tick_clock(app: &mut App, delta: Duration) {
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(delta);
    }

    #[test]
    fn step_system_advances_state_with_clamped_delta() {
        let mut app = flight_app();
        tick_clock(&mut app, Duration::from_millis(500));
        app.update();

        let state = app.world().resource::<FlightState>();
        let config = app.world().resource::<FlightConfig>();
        let expected_background = config.background.scroll_speed / 60.0;
        assert!((state.background_offset() - expected_background).abs() < 1e-3);

        let last = app.world().resource::<LastFrameReport>();
        assert_eq!(last.steps(), 1);
        assert!(last.get().is_some());
    }

    #[test]
    fn step_system_reads_thrust_flag() {
        let mut app = flight_app();
        app.world_mut()
            .resource_mut::<ThrustInput>()
            .apply(PointerEvent::Down(PointerSource::Mouse));
        tick_clock(&mut app, Duration::from_millis(16));
        app.update();

        let report = app
            .world()
            .resource::<LastFrameReport>()
            .get()
            .copied()
            .expect("a step should have run");
        assert_eq!(report.impulse, Some(-500.0));
        assert!(app.world().resource::<FlightState>().is_thrusting());
    }
}
