//! Periodic flight snapshots kept in memory and optionally appended to a JSON Lines log.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use super::{
    config::FlightConfig,
    state::{FlightState, ForwardMode},
    systems::LastFrameReport,
};
use crate::core::SimulationClock;

/// Sampled view of the flight state at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSnapshot {
    pub occurred_at_seconds: f64,
    pub position: [f32; 2],
    pub velocity_y: f32,
    pub forward_velocity: f32,
    pub thrusting: bool,
    pub forward_mode: Option<ForwardMode>,
    pub world_offset: f32,
    pub background_offset: f32,
    pub camera_scroll_x: f32,
    pub distance: u64,
}

impl FlightSnapshot {
    pub fn capture(
        occurred_at_seconds: f64,
        state: &FlightState,
        config: &FlightConfig,
        forward_mode: Option<ForwardMode>,
    ) -> Self {
        let position = state.position();
        Self {
            occurred_at_seconds,
            position: [position.x, position.y],
            velocity_y: state.velocity_y(),
            forward_velocity: state.forward_velocity(),
            thrusting: state.is_thrusting(),
            forward_mode,
            world_offset: state.world_offset(),
            background_offset: state.background_offset(),
            camera_scroll_x: state.camera_scroll_x(),
            distance: state.distance(&config.world),
        }
    }
}

/// Rolling buffer of recent snapshots.
#[derive(Resource, Debug)]
pub struct FlightTelemetry {
    capacity: usize,
    records: VecDeque<FlightSnapshot>,
    sample_timer: Timer,
}

impl FlightTelemetry {
    pub fn new(capacity: usize, sample_interval_seconds: f32) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
            sample_timer: Timer::from_seconds(sample_interval_seconds, TimerMode::Repeating),
        }
    }

    pub fn from_config(config: &FlightConfig) -> Self {
        Self::new(
            config.telemetry.capacity,
            config.telemetry.sample_interval_seconds,
        )
    }

    pub fn push(&mut self, record: FlightSnapshot) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[allow(dead_code)]
    pub fn records(&self) -> impl Iterator<Item = &FlightSnapshot> {
        self.records.iter()
    }

    #[allow(dead_code)]
    pub fn latest(&self) -> Option<&FlightSnapshot> {
        self.records.back()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pending snapshots waiting to be appended to disk.
#[derive(Resource, Debug)]
pub struct FlightTelemetryLog {
    output_path: PathBuf,
    pending: Vec<FlightSnapshot>,
}

impl FlightTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &FlightSnapshot) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            serde_json::to_writer(&mut file, &record)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Samples the flight state on the telemetry interval.
pub fn record_flight_telemetry(
    clock: Res<SimulationClock>,
    config: Res<FlightConfig>,
    state: Res<FlightState>,
    last_report: Res<LastFrameReport>,
    mut telemetry: ResMut<FlightTelemetry>,
    log: Option<ResMut<FlightTelemetryLog>>,
) {
    if !telemetry
        .sample_timer
        .tick(clock.last_scaled_delta())
        .just_finished()
    {
        return;
    }

    let record = FlightSnapshot::capture(
        clock.elapsed().as_secs_f64(),
        &state,
        &config,
        last_report.get().map(|report| report.forward_mode),
    );
    if let Some(mut log) = log {
        log.push(&record);
    }
    telemetry.push(record);
}

/// Flushes pending log entries, logging a warning if persistence fails.
pub fn flush_flight_telemetry_log(mut log: ResMut<FlightTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist flight telemetry to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn snapshot_at(seconds: f64) -> FlightSnapshot {
        let config = FlightConfig::default();
        let state = FlightState::new(&config);
        FlightSnapshot::capture(seconds, &state, &config, Some(ForwardMode::GlideMaintain))
    }

    #[test]
    fn telemetry_drops_old_records_when_full() {
        let mut telemetry = FlightTelemetry::new(2, 0.5);
        telemetry.push(snapshot_at(1.0));
        telemetry.push(snapshot_at(2.0));
        telemetry.push(snapshot_at(3.0));

        assert_eq!(telemetry.len(), 2);
        assert!(telemetry
            .records()
            .all(|record| record.occurred_at_seconds >= 2.0));
        assert_eq!(
            telemetry.latest().map(|record| record.occurred_at_seconds),
            Some(3.0)
        );
    }

    #[test]
    fn snapshot_captures_spawn_state() {
        let snapshot = snapshot_at(0.0);
        assert_eq!(snapshot.position, [200.0, 300.0]);
        assert_eq!(snapshot.forward_velocity, 70.0);
        assert_eq!(snapshot.distance, 0);
        assert!(!snapshot.thrusting);
    }

    #[test]
    fn telemetry_log_writes_json_lines() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("flight_log_test_{}.jsonl", unique_suffix));
        if path.exists() {
            let _ = fs::remove_file(&path);
        }

        let mut log = FlightTelemetryLog::new(&path);
        log.push(&snapshot_at(1.5));
        log.push(&snapshot_at(2.0));
        log.flush().expect("telemetry log should flush");
        assert!(log.is_empty());

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(value["occurred_at_seconds"], 1.5);
        assert_eq!(value["forward_mode"], "glide_maintain");
        assert_eq!(value["thrusting"], false);
        assert_eq!(value["distance"], 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn flushing_empty_log_creates_nothing() {
        let path = env::temp_dir().join("flight_log_never_written/history.jsonl");
        let mut log = FlightTelemetryLog::new(&path);
        log.flush().expect("empty flush is a no-op");
        assert!(!path.exists());
    }
}
