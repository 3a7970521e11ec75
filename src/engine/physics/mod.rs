// Minimal physics: gravity, velocity integration, and AABB collision
//
// This is deliberately not a general-purpose physics engine. Dynamic objects
// are axis-aligned boxes that integrate gravity and linear velocity each
// fixed step and resolve against static collision volumes axis by axis.

pub mod collider;
pub mod manager;
pub mod object;

pub use collider::Aabb;
pub use manager::{PhysicsHandle, PhysicsManager};
pub use object::PhysicsObject;
