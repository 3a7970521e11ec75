// Renderable game object management

use crate::core::color::Color;
use crate::engine::physics::{PhysicsHandle, PhysicsManager};
use glam::{Mat4, Quat, Vec3};

/// Handle identifying a game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectHandle(usize);

/// A renderable object: a colored cuboid with a transform
#[derive(Debug, Clone)]
pub struct GameObject {
    /// Translation in world space
    pub position: Vec3,

    /// Size of the cuboid along each axis
    pub scale: Vec3,

    /// Orientation
    pub rotation: Quat,

    /// Flat tint color
    pub color: Color,

    /// Invisible objects are skipped by the renderer
    pub visible: bool,

    /// Physics object whose center drives this object's position
    physics: Option<PhysicsHandle>,
}

impl GameObject {
    /// Create a white unit cuboid at the given position
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            rotation: Quat::IDENTITY,
            color: Color::WHITE,
            visible: true,
            physics: None,
        }
    }

    /// Create a colored cuboid
    pub fn with_color(position: Vec3, scale: Vec3, color: Color) -> Self {
        Self {
            color,
            ..Self::new(position, scale)
        }
    }

    /// Drive this object's position from a physics object after each step
    pub fn attach_physics(&mut self, handle: PhysicsHandle) {
        self.physics = Some(handle);
    }

    /// The physics object driving this one, if any
    pub fn physics(&self) -> Option<PhysicsHandle> {
        self.physics
    }

    /// Model matrix for rendering
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Handle-allocated set of renderable objects
#[derive(Debug, Default)]
pub struct ObjectManager {
    objects: Vec<Option<GameObject>>,
}

impl ObjectManager {
    /// Create an empty object manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its handle
    pub fn spawn(&mut self, object: GameObject) -> GameObjectHandle {
        if let Some(index) = self.objects.iter().position(Option::is_none) {
            self.objects[index] = Some(object);
            GameObjectHandle(index)
        } else {
            self.objects.push(Some(object));
            GameObjectHandle(self.objects.len() - 1)
        }
    }

    /// Remove an object
    pub fn remove(&mut self, handle: GameObjectHandle) {
        if let Some(slot) = self.objects.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Get an object by handle
    pub fn get(&self, handle: GameObjectHandle) -> Option<&GameObject> {
        self.objects.get(handle.0).and_then(Option::as_ref)
    }

    /// Get a mutable object by handle
    pub fn get_mut(&mut self, handle: GameObjectHandle) -> Option<&mut GameObject> {
        self.objects.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    /// Check if there are no live objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the objects the renderer should draw
    pub fn iter_visible(&self) -> impl Iterator<Item = &GameObject> {
        self.objects
            .iter()
            .filter_map(Option::as_ref)
            .filter(|o| o.visible)
    }

    /// Copy physics centers into the positions of physics-driven objects;
    /// runs after each physics step
    pub fn sync_from_physics(&mut self, physics: &PhysicsManager) {
        for object in self.objects.iter_mut().filter_map(Option::as_mut) {
            if let Some(handle) = object.physics {
                if let Some(body) = physics.get(handle) {
                    object.position = body.center();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{Aabb, PhysicsObject};

    #[test]
    fn test_spawn_and_get() {
        let mut objects = ObjectManager::new();
        let handle = objects.spawn(GameObject::new(Vec3::ZERO, Vec3::ONE));
        assert!(objects.get(handle).is_some());
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_remove_and_slot_reuse() {
        let mut objects = ObjectManager::new();
        let a = objects.spawn(GameObject::new(Vec3::ZERO, Vec3::ONE));
        let b = objects.spawn(GameObject::new(Vec3::ONE, Vec3::ONE));

        objects.remove(a);
        assert!(objects.get(a).is_none());

        let c = objects.spawn(GameObject::new(Vec3::ZERO, Vec3::ONE));
        assert_eq!(c, a);
        assert!(objects.get(b).is_some());
    }

    #[test]
    fn test_iter_visible_skips_hidden() {
        let mut objects = ObjectManager::new();
        objects.spawn(GameObject::new(Vec3::ZERO, Vec3::ONE));
        let hidden = objects.spawn(GameObject::new(Vec3::ONE, Vec3::ONE));
        objects.get_mut(hidden).unwrap().visible = false;

        assert_eq!(objects.iter_visible().count(), 1);
    }

    #[test]
    fn test_model_matrix_applies_scale_and_translation() {
        let object = GameObject::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 2.0, 2.0));
        let transformed = object.model_matrix() * glam::Vec4::new(0.5, 0.0, 0.0, 1.0);
        assert_eq!(transformed.truncate(), Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_sync_from_physics() {
        let mut physics = PhysicsManager::new();
        let body = physics.add_object(PhysicsObject::new_unaffected_by_gravity(Aabb::new(
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::splat(0.5),
        )));

        let mut objects = ObjectManager::new();
        let handle = objects.spawn(GameObject::new(Vec3::ZERO, Vec3::ONE));
        objects.get_mut(handle).unwrap().attach_physics(body);

        physics.get_mut(body).unwrap().set_center(Vec3::new(1.0, 2.0, 3.0));
        objects.sync_from_physics(&physics);

        assert_eq!(objects.get(handle).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unlinked_object_position_is_untouched() {
        let physics = PhysicsManager::new();
        let mut objects = ObjectManager::new();
        let handle = objects.spawn(GameObject::new(Vec3::new(7.0, 0.0, 0.0), Vec3::ONE));

        objects.sync_from_physics(&physics);
        assert_eq!(objects.get(handle).unwrap().position, Vec3::new(7.0, 0.0, 0.0));
    }
}
