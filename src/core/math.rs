// Math utilities and helper functions

use glam::Vec3;

/// Linear interpolation
#[allow(dead_code)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
#[allow(dead_code)]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Wrap an angle in radians into the [-PI, PI) range
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Move a value towards a target at a maximum delta
#[allow(dead_code)]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Move a vector towards a target at a maximum delta
pub fn move_towards_vec3(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let dist = diff.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + diff / dist * max_delta
    }
}
