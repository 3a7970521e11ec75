// First-person camera

use crate::core::math::wrap_angle;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Pitch limit just shy of straight up/down to keep the view basis stable
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Default radians of rotation per pixel of mouse motion
const DEFAULT_SENSITIVITY: f32 = 0.002;

/// A perspective first-person camera with yaw/pitch mouse-look
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,

    /// Rotation around the world Y axis; 0 looks down -Z
    yaw: f32,

    /// Rotation above/below the horizon, clamped to ±MAX_PITCH
    pitch: f32,

    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,

    sensitivity: f32,
    following_mouse: bool,

    // Cached matrices
    view: Mat4,
    proj: Mat4,
}

impl Camera {
    /// Create a camera at the given position looking down -Z
    pub fn new(position: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 70.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 500.0,
            sensitivity: DEFAULT_SENSITIVITY,
            following_mouse: false,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    /// Apply one tick of mouse-look from accumulated mouse motion (pixels)
    pub fn tick(&mut self, motion: Vec2) {
        if !self.following_mouse || motion == Vec2::ZERO {
            return;
        }
        self.yaw = wrap_angle(self.yaw + motion.x * self.sensitivity);
        self.pitch = (self.pitch - motion.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_matrices();
    }

    /// The direction the camera is looking, including pitch
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw)
    }

    /// Opposite of `forward`
    pub fn backward(&self) -> Vec3 {
        -self.forward()
    }

    /// The camera's right in the horizontal plane
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Opposite of `right`
    pub fn left(&self) -> Vec3 {
        -self.right()
    }

    /// World up
    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_matrices();
    }

    /// Yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Set the yaw in radians
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = wrap_angle(yaw);
        self.update_matrices();
    }

    /// Pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the pitch in radians, clamped to just shy of vertical
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.update_matrices();
    }

    /// Whether mouse motion drives the camera
    pub fn is_following_mouse(&self) -> bool {
        self.following_mouse
    }

    /// Enable or disable mouse-look
    pub fn set_following_mouse(&mut self, following: bool) {
        self.following_mouse = following;
    }

    /// Set mouse-look sensitivity (radians per pixel)
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity.max(0.0);
    }

    /// Set the vertical field of view in radians
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
        self.update_matrices();
    }

    /// Update the aspect ratio, e.g. after a window resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_matrices();
    }

    /// View matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.proj
    }

    /// Combined view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.proj * self.view
    }

    fn update_matrices(&mut self) {
        self.view = Mat4::look_to_rh(self.position, self.forward(), Vec3::Y);
        self.proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }
}

/// Camera data laid out for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Create a camera uniform from a camera
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::new(Vec3::ZERO, 16.0 / 9.0);
        let forward = camera.forward();
        assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_direction_vectors_are_consistent() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_yaw(0.7);
        camera.set_pitch(0.3);

        assert_relative_eq!(camera.forward().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.backward().dot(camera.forward()), -1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.left().dot(camera.right()), -1.0, epsilon = 1e-5);
        // Right stays horizontal regardless of pitch
        assert_relative_eq!(camera.right().y, 0.0, epsilon = 1e-6);
        // Right is perpendicular to the horizontal forward
        let mut level = camera.clone();
        level.set_pitch(0.0);
        assert_relative_eq!(level.forward().dot(level.right()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_quarter_turn_right_faces_positive_x() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_yaw(FRAC_PI_2);
        let forward = camera.forward();
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mouse_motion_turns_camera() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_following_mouse(true);
        camera.tick(Vec2::new(100.0, 0.0));
        assert!(camera.yaw() > 0.0);

        // Mouse up (negative dy) pitches up
        camera.tick(Vec2::new(0.0, -100.0));
        assert!(camera.pitch() > 0.0);
    }

    #[test]
    fn test_motion_ignored_when_not_following() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.tick(Vec2::new(500.0, 500.0));
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_pitch(10.0);
        assert!(camera.pitch() <= MAX_PITCH);
        camera.set_pitch(-10.0);
        assert!(camera.pitch() >= -MAX_PITCH);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_yaw(std::f32::consts::TAU + 0.25);
        assert_relative_eq!(camera.yaw(), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_view_moves_opposite_to_camera() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_position(Vec3::new(0.0, 0.0, 5.0));
        // A point in front of the camera lands on the view-space -Z axis
        let view_space = camera.view_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(view_space.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_uniform_matches_view_proj() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 1.5);
        let uniform = CameraUniform::new(&camera);
        assert_eq!(uniform.view_proj, camera.view_proj_matrix().to_cols_array_2d());
    }
}
