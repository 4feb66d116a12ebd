//! Spatial queries: sight-line obstruction and guard neighborhoods

pub mod raycast;
pub mod sparse_hash;

pub use raycast::{Aabb, ColliderTag, LayerMask, ObstacleField, OpenField, RayHit, SpatialQuery};
pub use sparse_hash::GuardGrid;
