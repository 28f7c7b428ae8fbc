//! Flight motion model: the per-frame state update for the bird, camera, and scrolling layers.
use bevy::prelude::*;
use serde::Serialize;

use super::body::{BodyBounds, BoundsHit, KinematicBody, PhysicsBody};
use super::config::{
    BackgroundTuning, CameraTuning, FlightBounds, FlightConfig, ForwardTuning, PhysicsTuning,
    WorldTuning,
};

/// Branch taken by the forward-speed update on a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardMode {
    /// Input held: linear gain.
    Boost,
    /// Falling faster than the threshold: strong per-frame decay.
    FallDecay,
    /// Gliding: near-constant speed.
    GlideMaintain,
}

impl ForwardMode {
    #[cfg_attr(not(feature = "flight_debug"), allow(dead_code))]
    pub fn label(self) -> &'static str {
        match self {
            Self::Boost => "boost",
            Self::FallDecay => "fall decay",
            Self::GlideMaintain => "glide",
        }
    }
}

/// What a single step did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Downward acceleration handed to the integrator this frame.
    pub gravity: f32,
    /// Vertical velocity written by the thrust impulse, if thrusting.
    pub impulse: Option<f32>,
    pub forward_mode: ForwardMode,
    pub bounds_hit: BoundsHit,
    pub distance: u64,
}

/// Converts the accumulated world offset into whole displayed meters.
pub fn distance_meters(world_offset: f32, units_per_meter: f32) -> u64 {
    if units_per_meter <= 0.0 || !world_offset.is_finite() {
        return 0;
    }
    (world_offset / units_per_meter).floor().max(0.0) as u64
}

/// Mutable flight state owned by the scene, advanced once per rendered frame.
#[derive(Resource, Debug, Clone)]
pub struct FlightState<B = KinematicBody> {
    body: B,
    forward_velocity: f32,
    thrusting: bool,
    world_offset: f32,
    background_offset: f32,
    camera_scroll_x: f32,
}

impl FlightState<KinematicBody> {
    /// Builds the scene-start state: bird at the spawn point, base forward speed, zero offsets.
    pub fn new(config: &FlightConfig) -> Self {
        let body = KinematicBody::new(
            config.bounds.spawn,
            config.physics.drag,
            Vec2::new(config.forward.max_speed, config.physics.max_velocity_y),
        );
        Self::with_body(body, config)
    }
}

impl<B: PhysicsBody> FlightState<B> {
    pub fn with_body(body: B, config: &FlightConfig) -> Self {
        Self {
            body,
            forward_velocity: config.forward.base_speed,
            thrusting: false,
            world_offset: 0.0,
            background_offset: 0.0,
            camera_scroll_x: 0.0,
        }
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn velocity_y(&self) -> f32 {
        self.body.velocity().y
    }

    pub fn forward_velocity(&self) -> f32 {
        self.forward_velocity
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn world_offset(&self) -> f32 {
        self.world_offset
    }

    pub fn background_offset(&self) -> f32 {
        self.background_offset
    }

    pub fn camera_scroll_x(&self) -> f32 {
        self.camera_scroll_x
    }

    pub fn distance(&self, world: &WorldTuning) -> u64 {
        distance_meters(self.world_offset, world.units_per_meter)
    }

    /// Runs one frame. Sub-steps execute in a fixed order; later ones read what earlier ones wrote.
    pub fn step(&mut self, delta: f32, thrusting: bool, config: &FlightConfig) -> FrameReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.thrusting = thrusting;

        let (gravity, impulse) = self.apply_vertical_force(thrusting, &config.physics);
        let forward_mode = self.update_forward_velocity(delta, thrusting, &config.forward);

        let velocity_y = self.body.velocity().y;
        self.body
            .apply_velocity(Vec2::new(self.forward_velocity, velocity_y));
        self.body.integrate(delta, gravity);

        let bounds_hit = self.enforce_bounds(&config.bounds);
        self.update_camera(&config.camera);
        self.advance_world(delta, &config.world);
        self.advance_background(delta, &config.background);

        FrameReport {
            gravity,
            impulse,
            forward_mode,
            bounds_hit,
            distance: self.distance(&config.world),
        }
    }

    /// Selects this frame's gravity and, when thrusting, overwrites vertical velocity with the impulse.
    pub fn apply_vertical_force(
        &mut self,
        thrusting: bool,
        physics: &PhysicsTuning,
    ) -> (f32, Option<f32>) {
        if thrusting {
            let velocity = self.body.velocity();
            self.body
                .apply_velocity(Vec2::new(velocity.x, physics.thrust));
            // The body may cap the write; report what it kept.
            (physics.gravity, Some(self.body.velocity().y))
        } else {
            (physics.glide_gravity, None)
        }
    }

    pub fn update_forward_velocity(
        &mut self,
        delta: f32,
        thrusting: bool,
        forward: &ForwardTuning,
    ) -> ForwardMode {
        let mode = if thrusting {
            self.forward_velocity += forward.thrust_boost * delta;
            ForwardMode::Boost
        } else if self.body.velocity().y > forward.fall_threshold {
            self.forward_velocity *= forward.fall_deceleration;
            ForwardMode::FallDecay
        } else {
            self.forward_velocity *= forward.glide_maintain;
            ForwardMode::GlideMaintain
        };

        self.forward_velocity = self
            .forward_velocity
            .clamp(forward.base_speed, forward.max_speed);
        mode
    }

    pub fn enforce_bounds(&mut self, bounds: &FlightBounds) -> BoundsHit {
        let limits = BodyBounds::new(
            Vec2::new(bounds.min_x, 0.0),
            Vec2::new(bounds.max_x, bounds.height),
        );
        self.body.clamp_to(&limits)
    }

    /// Eases the camera a fixed fraction of the way towards its distance-proportional target.
    pub fn update_camera(&mut self, camera: &CameraTuning) {
        let target = self.world_offset * camera.lead_factor;
        self.camera_scroll_x += (target - self.camera_scroll_x) * camera.lerp;
    }

    pub fn advance_world(&mut self, delta: f32, world: &WorldTuning) {
        self.world_offset += self.forward_velocity * delta * world.scroll_factor;
    }

    pub fn advance_background(&mut self, delta: f32, background: &BackgroundTuning) {
        self.background_offset += background.scroll_speed * delta;
    }

    #[cfg(test)]
    pub(crate) fn set_forward_velocity(&mut self, value: f32) {
        self.forward_velocity = value;
    }

    #[cfg(test)]
    pub(crate) fn set_world_offset(&mut self, value: f32) {
        self.world_offset = value;
    }
}
