//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// 2D world position / direction
pub use glam::Vec2;

/// Fixed-step counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for guards
///
/// Assigned sequentially by the roster so runs are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuardId(pub u32);

impl GuardId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GuardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guard#{}", self.0)
    }
}

/// Alert group a guard belongs to (not unique, many guards share one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl GroupId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Unique identifier for lure attractors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LureId(pub u32);

impl std::fmt::Display for LureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lure#{}", self.0)
    }
}

/// Horizontal facing of a sprite-flipped actor
///
/// Guards never rotate; they only flip left/right based on horizontal
/// movement, so the facing vector is always one of the two unit axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Minimum horizontal offset that flips the facing
    pub const FLIP_EPSILON: f32 = 0.01;

    pub fn vector(&self) -> Vec2 {
        match self {
            Facing::Right => Vec2::X,
            Facing::Left => Vec2::NEG_X,
        }
    }

    /// Facing after looking from `from` toward `to`; unchanged when the
    /// horizontal offset is negligible
    pub fn toward(self, from: Vec2, to: Vec2) -> Self {
        let dx = to.x - from.x;
        if dx.abs() < Self::FLIP_EPSILON {
            self
        } else if dx > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}
