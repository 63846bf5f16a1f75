use super::PhysicsError;
use crate::core::math::round_half_up;
use glam::Vec2;

/// Kinematic state of a single sprite
///
/// Integration is semi-implicit Euler with a unit timestep: one call to
/// [`KinematicBody::integrate`] is one tick. Acceleration is never reset
/// by the integrator; callers that do not want forces to compound must
/// call [`KinematicBody::reset_acceleration`] themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    /// World position of the local frame's top-left corner
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Converts applied forces into acceleration; must be positive when a force is applied
    pub mass: f32,
    /// Degrees, applied around `origin`
    pub rotation: f32,
    /// Width and height in world units
    pub scale: Vec2,
    /// Rotation pivot, relative to the local frame
    pub origin: Vec2,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            rotation: 0.0,
            scale: Vec2::ZERO,
            origin: Vec2::ZERO,
        }
    }
}

impl KinematicBody {
    /// Advance one tick: `velocity += acceleration`, then `position += velocity`
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
    }

    /// Accumulate `force / mass` into the acceleration
    pub fn apply_force(&mut self, fx: f32, fy: f32) -> Result<(), PhysicsError> {
        if self.mass <= 0.0 || !self.mass.is_finite() {
            log::warn!("Rejected force ({}, {}) on body with mass {}", fx, fy, self.mass);
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        self.acceleration += Vec2::new(fx, fy) / self.mass;
        Ok(())
    }

    /// Accumulate acceleration directly
    pub fn apply_acceleration(&mut self, ax: f32, ay: f32) {
        self.acceleration += Vec2::new(ax, ay);
    }

    /// Replace the velocity outright
    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    /// Store a new mass; validity is checked when a force is applied
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    /// Zero the accumulated acceleration
    pub fn reset_acceleration(&mut self) {
        self.acceleration = Vec2::ZERO;
    }

    /// Set width and height, clamped to be non-negative
    pub fn set_scale(&mut self, width: f32, height: f32) {
        self.scale = Vec2::new(width.max(0.0), height.max(0.0));
    }

    /// Add `degrees` to the current rotation
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    /// Position rounded to whole pixels, for mask lookups
    pub fn pixel_position(&self) -> (i32, i32) {
        (round_half_up(self.position.x), round_half_up(self.position.y))
    }

    /// Scale rounded to whole pixels, the size of the collision mask
    pub fn pixel_size(&self) -> (i32, i32) {
        (round_half_up(self.scale.x), round_half_up(self.scale.y))
    }
}

/// Builder for kinematic bodies
pub struct BodyBuilder {
    body: KinematicBody,
}

impl BodyBuilder {
    /// Start from a unit-mass body at the origin with zero size
    pub fn new() -> Self {
        Self {
            body: KinematicBody::default(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.body.position = Vec2::new(x, y);
        self
    }

    /// Set width and height
    pub fn scale(mut self, width: f32, height: f32) -> Self {
        self.body.set_scale(width, height);
        self
    }

    /// Set the rotation pivot
    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.body.origin = Vec2::new(x, y);
        self
    }

    /// Set the rotation in degrees
    pub fn rotation(mut self, degrees: f32) -> Self {
        self.body.rotation = degrees;
        self
    }

    /// Set the initial velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.body.velocity = Vec2::new(x, y);
        self
    }

    /// Set the mass
    pub fn mass(mut self, mass: f32) -> Self {
        self.body.mass = mass;
        self
    }

    pub fn build(self) -> KinematicBody {
        self.body
    }
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
