// First-person player controller
//
// Moves a physics object with camera-relative keyboard input and keeps the
// camera glued to it. Movement is applied as velocity: each tick the
// controller withdraws the planar velocity it added last tick and applies a
// fresh one, so other velocity sources (knockback, jumps, gravity) survive.

use crate::engine::input::KeyManager;
use crate::engine::physics::{Aabb, PhysicsHandle, PhysicsManager, PhysicsObject};
use crate::engine::renderer::Camera;
use glam::Vec3;
use winit::keyboard::KeyCode;

/// Default horizontal movement speed (m/s)
pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

/// Default upward velocity applied on jump (m/s)
pub const DEFAULT_JUMP_VELOCITY: f32 = 8.0;

const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.9, 0.4);
const DEFAULT_EYE_HEIGHT: f32 = 0.6;
const DEFAULT_HEALTH: i32 = 10;

/// A first-person player: physics body, movement tuning, and health
pub struct Player {
    body: PhysicsHandle,
    move_speed: f32,
    jump_velocity: f32,
    eye_height: f32,
    added_velocity: Vec3,
    default_input: bool,
    health: i32,
}

impl Player {
    /// Spawn a player body at the given position (center of its volume)
    pub fn new(physics: &mut PhysicsManager, spawn: Vec3) -> Self {
        let body = physics.add_object(PhysicsObject::new(Aabb::new(spawn, DEFAULT_HALF_EXTENTS)));
        Self {
            body,
            move_speed: DEFAULT_MOVE_SPEED,
            jump_velocity: DEFAULT_JUMP_VELOCITY,
            eye_height: DEFAULT_EYE_HEIGHT,
            added_velocity: Vec3::ZERO,
            default_input: true,
            health: DEFAULT_HEALTH,
        }
    }

    /// Run one tick of input-driven movement, then sync the camera to the
    /// body
    pub fn tick(&mut self, keys: &KeyManager, camera: &mut Camera, physics: &mut PhysicsManager) {
        if self.default_input {
            let mut wish = Vec3::ZERO;
            if keys.is_pressed(KeyCode::KeyW) {
                wish += Self::planar(camera.forward()) * self.move_speed;
            } else if keys.is_pressed(KeyCode::KeyS) {
                wish += Self::planar(camera.backward()) * self.move_speed;
            }
            if keys.is_pressed(KeyCode::KeyA) {
                wish += camera.left() * self.move_speed;
            } else if keys.is_pressed(KeyCode::KeyD) {
                wish += camera.right() * self.move_speed;
            }

            if let Some(body) = physics.get_mut(self.body) {
                // A component the solver zeroed on contact has nothing left
                // to withdraw
                let velocity = body.velocity();
                if velocity.x == 0.0 {
                    self.added_velocity.x = 0.0;
                }
                if velocity.z == 0.0 {
                    self.added_velocity.z = 0.0;
                }

                body.add_linear_velocity(-self.added_velocity);
                body.add_linear_velocity(wish);
                self.added_velocity = wish;
            }

            if keys.is_pressed(KeyCode::Space) {
                self.jump(physics);
            }
        }

        if let Some(body) = physics.get(self.body) {
            camera.set_position(body.center() + Vec3::Y * self.eye_height);
        }
    }

    /// Jump by setting the vertical velocity, allowed only while the current
    /// vertical velocity is exactly zero (i.e. resting on a surface)
    pub fn jump(&self, physics: &mut PhysicsManager) {
        if let Some(body) = physics.get_mut(self.body) {
            if body.velocity().y == 0.0 {
                body.velocity_mut().y = self.jump_velocity;
            }
        }
    }

    /// Teleport the player and snap the camera to the new position
    pub fn set_location(
        &mut self,
        physics: &mut PhysicsManager,
        camera: &mut Camera,
        location: Vec3,
    ) {
        if let Some(body) = physics.get_mut(self.body) {
            body.set_center(location);
            camera.set_position(location + Vec3::Y * self.eye_height);
        }
    }

    /// Current position (center of the physics volume)
    pub fn location(&self, physics: &PhysicsManager) -> Option<Vec3> {
        physics.get(self.body).map(|body| body.center())
    }

    /// The player's physics handle
    pub fn body(&self) -> PhysicsHandle {
        self.body
    }

    /// Enable or disable the built-in keyboard movement
    pub fn enable_default_input(&mut self, enabled: bool) {
        self.default_input = enabled;
    }

    /// Horizontal movement speed (m/s)
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Set the horizontal movement speed (m/s)
    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    /// Upward velocity applied on jump (m/s)
    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }

    /// Set the upward velocity applied on jump (m/s)
    pub fn set_jump_velocity(&mut self, jump_velocity: f32) {
        self.jump_velocity = jump_velocity;
    }

    /// Current health
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Set the current health
    pub fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    /// Project a camera direction onto the horizontal plane
    fn planar(direction: Vec3) -> Vec3 {
        Vec3::new(direction.x, 0.0, direction.z)
    }
}
