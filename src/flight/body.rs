//! Physics body abstraction and the kinematic integrator driving the bird.
use bevy::math::Vec2;

/// Axis-aligned region the body is kept inside after integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl BodyBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Which walls stopped the body during a clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsHit {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BoundsHit {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// A 2D body whose velocity is set by the flight model and advanced once per frame.
///
/// Screen convention: `+y` points down, so negative vertical velocity is upward.
pub trait PhysicsBody {
    fn position(&self) -> Vec2;

    fn velocity(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    /// Overwrites the body's velocity for the coming integration.
    fn apply_velocity(&mut self, velocity: Vec2);

    /// Advances the body by `delta` seconds under the supplied downward acceleration.
    fn integrate(&mut self, delta: f32, gravity: f32);

    /// Pulls the body back inside `bounds`, removing velocity that pushes into a wall.
    fn clamp_to(&mut self, bounds: &BodyBounds) -> BoundsHit;
}

/// Semi-implicit Euler integrator with exponential drag and a per-axis speed cap.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    position: Vec2,
    velocity: Vec2,
    /// Fraction of velocity retained per second, applied equally on both axes.
    drag: f32,
    max_velocity: Vec2,
}

impl KinematicBody {
    pub fn new(position: Vec2, drag: f32, max_velocity: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            drag: drag.clamp(0.0, 1.0),
            max_velocity: max_velocity.abs(),
        }
    }

    fn clamp_velocity(&mut self) {
        self.velocity = self.velocity.clamp(-self.max_velocity, self.max_velocity);
    }
}

impl PhysicsBody for KinematicBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn apply_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.clamp_velocity();
    }

    fn integrate(&mut self, delta: f32, gravity: f32) {
        if delta <= 0.0 || !delta.is_finite() {
            return;
        }

        self.velocity.y += gravity * delta;
        if self.drag < 1.0 {
            self.velocity *= self.drag.powf(delta);
        }
        self.clamp_velocity();
        self.position += self.velocity * delta;
    }

    fn clamp_to(&mut self, bounds: &BodyBounds) -> BoundsHit {
        let mut hit = BoundsHit::default();

        if self.position.x < bounds.min.x {
            self.position.x = bounds.min.x;
            self.velocity.x = self.velocity.x.max(0.0);
            hit.left = true;
        } else if self.position.x > bounds.max.x {
            self.position.x = bounds.max.x;
            self.velocity.x = self.velocity.x.min(0.0);
            hit.right = true;
        }

        if self.position.y < bounds.min.y {
            self.position.y = bounds.min.y;
            self.velocity.y = self.velocity.y.max(0.0);
            hit.top = true;
        } else if self.position.y > bounds.max.y {
            self.position.y = bounds.max.y;
            self.velocity.y = self.velocity.y.min(0.0);
            hit.bottom = true;
        }

        hit
    }
}
