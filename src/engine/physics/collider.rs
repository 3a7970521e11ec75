// Axis-aligned bounding box collision volume

use glam::Vec3;

/// An axis-aligned box described by its center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Center of the box in world space
    pub center: Vec3,

    /// Half the box size along each axis
    pub half_extents: Vec3,

    /// Inactive volumes neither collide nor resolve
    pub active: bool,
}

impl Aabb {
    /// Create a new active collision volume
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            active: true,
        }
    }

    /// Create a volume from its min and max corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Overlap test against another box. Boxes that merely touch at a face
    /// do not count as intersecting, so a resolved contact stays stable.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let diff = (self.center - other.center).abs();
        let combined = self.half_extents + other.half_extents;
        diff.x < combined.x && diff.y < combined.y && diff.z < combined.z
    }

    /// Check if a point lies inside the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        let diff = (point - self.center).abs();
        diff.x <= self.half_extents.x
            && diff.y <= self.half_extents.y
            && diff.z <= self.half_extents.z
    }

    /// A copy of this box moved by the given offset
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            ..*self
        }
    }
}
