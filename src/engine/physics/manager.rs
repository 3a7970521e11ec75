// Physics manager: owns all collision volumes and steps the simulation

use super::collider::Aabb;
use super::object::PhysicsObject;
use glam::Vec3;

/// Handle identifying a dynamic physics object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsHandle(usize);

/// Owns dynamic objects and static collision volumes and advances them each
/// fixed step
#[derive(Debug, Default)]
pub struct PhysicsManager {
    objects: Vec<Option<PhysicsObject>>,
    statics: Vec<Aabb>,
}

impl PhysicsManager {
    /// Create an empty physics manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dynamic object, returning its handle
    pub fn add_object(&mut self, object: PhysicsObject) -> PhysicsHandle {
        // Reuse a freed slot so handles stay stable
        if let Some(index) = self.objects.iter().position(Option::is_none) {
            self.objects[index] = Some(object);
            PhysicsHandle(index)
        } else {
            self.objects.push(Some(object));
            PhysicsHandle(self.objects.len() - 1)
        }
    }

    /// Remove a dynamic object
    pub fn remove_object(&mut self, handle: PhysicsHandle) {
        if let Some(slot) = self.objects.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Add a static collision volume (floors, walls, platforms)
    pub fn add_static(&mut self, volume: Aabb) {
        self.statics.push(volume);
    }

    /// The static collision volumes
    pub fn statics(&self) -> &[Aabb] {
        &self.statics
    }

    /// Get a dynamic object by handle
    pub fn get(&self, handle: PhysicsHandle) -> Option<&PhysicsObject> {
        self.objects.get(handle.0).and_then(Option::as_ref)
    }

    /// Get a mutable dynamic object by handle
    pub fn get_mut(&mut self, handle: PhysicsHandle) -> Option<&mut PhysicsObject> {
        self.objects.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Number of live dynamic objects
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Each active object first integrates gravity into its velocity, then
    /// moves one axis at a time. A move that would enter an active static
    /// volume is clipped to flush contact and the velocity component along
    /// that axis is zeroed, so an object resting on a floor reads vertical
    /// velocity 0.
    pub fn step(&mut self, dt: f32) {
        for slot in &mut self.objects {
            let Some(object) = slot.as_mut() else {
                continue;
            };
            if !object.collider.active {
                continue;
            }

            if object.gravity_enabled() {
                object.velocity_mut().y += object.gravity_acceleration() * dt;
            }

            let velocity = object.velocity();
            for axis in 0..3 {
                let delta = velocity[axis] * dt;
                if delta == 0.0 {
                    continue;
                }

                let mut candidate = object.collider;
                candidate.center[axis] += delta;

                // Clip against every static the move would enter, keeping the
                // most restrictive contact
                let mut limit: Option<f32> = None;
                for volume in self.statics.iter().filter(|v| v.active) {
                    if !candidate.intersects(volume) {
                        continue;
                    }
                    let flush = if delta > 0.0 {
                        volume.min()[axis] - candidate.half_extents[axis]
                    } else {
                        volume.max()[axis] + candidate.half_extents[axis]
                    };
                    limit = Some(match limit {
                        Some(current) if delta > 0.0 => current.min(flush),
                        Some(current) => current.max(flush),
                        None => flush,
                    });
                }

                if let Some(flush) = limit {
                    object.collider.center[axis] = flush;
                    object.velocity_mut()[axis] = 0.0;
                } else {
                    object.collider.center[axis] = candidate.center[axis];
                }
            }
        }
    }

    /// Handles of all dynamic objects whose volumes overlap the given one
    pub fn intersecting(&self, handle: PhysicsHandle) -> Vec<PhysicsHandle> {
        let Some(object) = self.get(handle) else {
            return Vec::new();
        };
        if !object.collider.active {
            return Vec::new();
        }

        self.objects
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let other = slot.as_ref()?;
                if index != handle.0
                    && other.collider.active
                    && object.collider.intersects(&other.collider)
                {
                    Some(PhysicsHandle(index))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Check whether a volume overlaps any active static
    pub fn overlaps_static(&self, volume: &Aabb) -> bool {
        self.statics
            .iter()
            .any(|s| s.active && s.intersects(volume))
    }

    /// Check whether a point lies inside any active static
    pub fn point_in_static(&self, point: Vec3) -> bool {
        self.statics
            .iter()
            .any(|s| s.active && s.contains_point(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Aabb {
        // 20x20 floor slab with its top surface at y = 0
        Aabb::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
    }

    fn step_n(physics: &mut PhysicsManager, n: usize) {
        for _ in 0..n {
            physics.step(DT);
        }
    }

    #[test]
    fn test_gravity_accelerates_velocity() {
        let mut physics = PhysicsManager::new();
        let handle = physics.add_object(PhysicsObject::new(Aabb::new(
            Vec3::new(0.0, 50.0, 0.0),
            Vec3::splat(0.5),
        )));

        physics.step(DT);

        let object = physics.get(handle).unwrap();
        let expected = object.gravity_acceleration() * DT;
        assert!((object.velocity().y - expected).abs() < 1e-5);
        assert!(object.center().y < 50.0);
    }

    #[test]
    fn test_gravity_disabled_object_floats() {
        let mut physics = PhysicsManager::new();
        let handle = physics.add_object(PhysicsObject::new_unaffected_by_gravity(Aabb::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::splat(0.5),
        )));

        step_n(&mut physics, 60);

        let object = physics.get(handle).unwrap();
        assert_eq!(object.center(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(object.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_falling_object_lands_flush_with_zero_vertical_velocity() {
        let mut physics = PhysicsManager::new();
        physics.add_static(floor());
        let handle = physics.add_object(PhysicsObject::new(Aabb::new(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::splat(0.5),
        )));

        // More than enough time to fall 2.5m
        step_n(&mut physics, 300);

        let object = physics.get(handle).unwrap();
        assert_eq!(object.velocity().y, 0.0);
        // Resting flush: bottom face on the floor's top surface
        assert!((object.center().y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_motion_survives_landing() {
        let mut physics = PhysicsManager::new();
        physics.add_static(floor());
        let handle = physics.add_object(PhysicsObject::new(Aabb::new(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::splat(0.5),
        )));
        physics
            .get_mut(handle)
            .unwrap()
            .set_velocity(Vec3::new(2.0, 0.0, 0.0));

        step_n(&mut physics, 60);

        let object = physics.get(handle).unwrap();
        // Vertical contact zeroes only the y component
        assert!((object.velocity().x - 2.0).abs() < 1e-5);
        assert!(object.center().x > 1.5);
    }

    #[test]
    fn test_wall_blocks_only_one_axis() {
        let mut physics = PhysicsManager::new();
        physics.add_static(floor());
        // Wall at x = 2
        physics.add_static(Aabb::new(
            Vec3::new(2.5, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 10.0),
        ));

        let handle = physics.add_object(PhysicsObject::new(Aabb::new(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::splat(0.5),
        )));
        physics
            .get_mut(handle)
            .unwrap()
            .set_velocity(Vec3::new(5.0, 0.0, 1.0));

        step_n(&mut physics, 120);

        let object = physics.get(handle).unwrap();
        // Clipped flush against the wall face at x = 2
        assert!((object.center().x - 1.5).abs() < 1e-4);
        assert_eq!(object.velocity().x, 0.0);
        // Still sliding along z
        assert!(object.center().z > 1.0);
    }

    #[test]
    fn test_inactive_static_is_ignored() {
        let mut physics = PhysicsManager::new();
        let mut ghost = floor();
        ghost.active = false;
        physics.add_static(ghost);

        let handle = physics.add_object(PhysicsObject::new(Aabb::new(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::splat(0.5),
        )));

        step_n(&mut physics, 120);

        // Fell straight through the inactive floor
        assert!(physics.get(handle).unwrap().center().y < -1.0);
    }

    #[test]
    fn test_inactive_object_does_not_move() {
        let mut physics = PhysicsManager::new();
        let mut collider = Aabb::new(Vec3::new(0.0, 3.0, 0.0), Vec3::splat(0.5));
        collider.active = false;
        let handle = physics.add_object(PhysicsObject::new(collider));

        step_n(&mut physics, 60);

        assert_eq!(physics.get(handle).unwrap().center().y, 3.0);
    }

    #[test]
    fn test_overlap_query_between_objects() {
        let mut physics = PhysicsManager::new();
        let a = physics.add_object(PhysicsObject::new_unaffected_by_gravity(Aabb::new(
            Vec3::ZERO,
            Vec3::ONE,
        )));
        let b = physics.add_object(PhysicsObject::new_unaffected_by_gravity(Aabb::new(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ONE,
        )));
        let far = physics.add_object(PhysicsObject::new_unaffected_by_gravity(Aabb::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ONE,
        )));

        let hits = physics.intersecting(a);
        assert_eq!(hits, vec![b]);
        assert!(physics.intersecting(far).is_empty());
    }

    #[test]
    fn test_handle_reuse_after_removal() {
        let mut physics = PhysicsManager::new();
        let a = physics.add_object(PhysicsObject::new(Aabb::new(Vec3::ZERO, Vec3::ONE)));
        let b = physics.add_object(PhysicsObject::new(Aabb::new(Vec3::ONE, Vec3::ONE)));
        assert_eq!(physics.object_count(), 2);

        physics.remove_object(a);
        assert!(physics.get(a).is_none());
        assert_eq!(physics.object_count(), 1);

        let c = physics.add_object(PhysicsObject::new(Aabb::new(Vec3::ZERO, Vec3::ONE)));
        assert_eq!(c, a); // freed slot reused
        assert!(physics.get(b).is_some());
    }

    #[test]
    fn test_overlaps_static() {
        let mut physics = PhysicsManager::new();
        physics.add_static(floor());

        let inside = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::splat(0.6));
        let above = Aabb::new(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5));
        assert!(physics.overlaps_static(&inside));
        assert!(!physics.overlaps_static(&above));
        assert!(physics.point_in_static(Vec3::new(0.0, -0.5, 0.0)));
    }
}
