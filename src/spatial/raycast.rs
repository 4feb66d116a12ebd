//! Obstruction queries along a sight line
//!
//! The core only depends on the [`SpatialQuery`] trait; [`ObstacleField`] is
//! a small box/circle world used by the headless runner and the tests.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Bit set of collision layers a query considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Layer of static walls and props
    pub const WALLS: LayerMask = LayerMask(1 << 0);
    /// Layer of the player's own collider
    pub const PLAYER: LayerMask = LayerMask(1 << 1);

    pub fn intersects(&self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// What a ray ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderTag {
    /// The player's own body; never blocks sight of the player
    Player,
    /// Anything opaque, with an index for debugging
    Obstacle(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec2,
    pub tag: ColliderTag,
}

/// Ray obstruction test provided by the host world
pub trait SpatialQuery {
    /// Nearest collider on `mask` hit by the ray within `max_distance`
    ///
    /// `direction` is expected to be normalized.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}

/// Query that never reports a hit (open field)
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl SpatialQuery for OpenField {
    fn raycast(&self, _: Vec2, _: Vec2, _: f32, _: LayerMask) -> Option<RayHit> {
        None
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Entry distance of a ray into the box (slab test); 0 when starting inside
    pub fn ray_entry(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for (o, d, lo, hi) in [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.y, direction.y, self.min.y, self.max.y),
        ] {
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let mut t1 = (lo - o) / d;
            let mut t2 = (hi - o) / d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Entry distance of a ray into a circle; 0 when starting inside
fn ray_circle_entry(origin: Vec2, direction: Vec2, max_distance: f32, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()).max(0.0);
    (t <= max_distance).then_some(t)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Wall {
    bounds: Aabb,
    layer: LayerMask,
}

/// Static walls plus the player's body
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    walls: Vec<Wall>,
    player: Option<(Vec2, f32)>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an opaque wall on the walls layer, returning its obstacle index
    pub fn add_wall(&mut self, bounds: Aabb) -> u32 {
        self.add_on_layer(bounds, LayerMask::WALLS)
    }

    pub fn add_on_layer(&mut self, bounds: Aabb, layer: LayerMask) -> u32 {
        self.walls.push(Wall { bounds, layer });
        (self.walls.len() - 1) as u32
    }

    /// Place (or move) the player's circular collider
    pub fn set_player(&mut self, position: Vec2, radius: f32) {
        self.player = Some((position, radius));
    }

    pub fn clear_player(&mut self) {
        self.player = None;
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }
}

impl SpatialQuery for ObstacleField {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let mut best: Option<(f32, ColliderTag)> = None;
        let mut consider = |t: f32, tag: ColliderTag| {
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, tag));
            }
        };

        for (idx, wall) in self.walls.iter().enumerate() {
            if !mask.intersects(wall.layer) {
                continue;
            }
            if let Some(t) = wall.bounds.ray_entry(origin, direction, max_distance) {
                consider(t, ColliderTag::Obstacle(idx as u32));
            }
        }

        if mask.intersects(LayerMask::PLAYER) {
            if let Some((center, radius)) = self.player {
                if let Some(t) = ray_circle_entry(origin, direction, max_distance, center, radius) {
                    consider(t, ColliderTag::Player);
                }
            }
        }

        best.map(|(distance, tag)| RayHit {
            distance,
            point: origin + direction * distance,
            tag,
        })
    }
}
