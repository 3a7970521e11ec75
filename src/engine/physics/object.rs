// Dynamic physics object state

use super::collider::Aabb;
use glam::Vec3;

/// Default downward acceleration applied to gravity-enabled objects (m/s²)
pub const DEFAULT_GRAVITY: f32 = -20.0;

/// A dynamic object with a collision volume, linear velocity, and gravity
#[derive(Debug, Clone)]
pub struct PhysicsObject {
    /// The object's collision volume; its center is the object's position
    pub collider: Aabb,

    velocity: Vec3,
    gravity_acceleration: f32,
    gravity_enabled: bool,
}

impl PhysicsObject {
    /// Create a new object with gravity enabled at the default strength
    pub fn new(collider: Aabb) -> Self {
        Self {
            collider,
            velocity: Vec3::ZERO,
            gravity_acceleration: DEFAULT_GRAVITY,
            gravity_enabled: true,
        }
    }

    /// Create an object that ignores gravity
    pub fn new_unaffected_by_gravity(collider: Aabb) -> Self {
        Self {
            gravity_enabled: false,
            ..Self::new(collider)
        }
    }

    /// Current linear velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Mutable access to the linear velocity
    pub fn velocity_mut(&mut self) -> &mut Vec3 {
        &mut self.velocity
    }

    /// Replace the linear velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Add to the linear velocity
    pub fn add_linear_velocity(&mut self, delta: Vec3) {
        self.velocity += delta;
    }

    /// Vertical acceleration applied while gravity is enabled (m/s², negative
    /// is downward)
    pub fn gravity_acceleration(&self) -> f32 {
        self.gravity_acceleration
    }

    /// Set the vertical acceleration applied while gravity is enabled
    pub fn set_gravity_acceleration(&mut self, acceleration: f32) {
        self.gravity_acceleration = acceleration;
    }

    /// Check whether gravity affects this object
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Enable or disable gravity for this object
    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    /// The object's position (center of its collision volume)
    pub fn center(&self) -> Vec3 {
        self.collider.center
    }

    /// Move the object to a new position
    pub fn set_center(&mut self, center: Vec3) {
        self.collider.center = center;
    }
}
