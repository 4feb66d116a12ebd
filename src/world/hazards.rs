//! Terrain hazards (cliffs and holes)
//!
//! Guards ask "is this point dangerous" when choosing patrol/wander targets,
//! and fall when their own position turns out to be dangerous.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::spatial::raycast::Aabb;

/// Point query for dangerous ground
pub trait TerrainHazards {
    fn is_hazardous(&self, point: Vec2) -> bool;

    /// Center of the dangerous zone under `point`, where a falling guard slides to
    fn hazard_center(&self, point: Vec2) -> Option<Vec2> {
        self.is_hazardous(point).then_some(point)
    }
}

/// Ground with no hazards
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeGround;

impl TerrainHazards for SafeGround {
    fn is_hazardous(&self, _: Vec2) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Always dangerous
    Cliff,
    /// Dangerous until something is pushed over it
    Hole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub kind: HazardKind,
    pub bounds: Aabb,
    #[serde(default)]
    pub covered: bool,
}

impl HazardZone {
    pub fn cliff(bounds: Aabb) -> Self {
        Self {
            kind: HazardKind::Cliff,
            bounds,
            covered: false,
        }
    }

    pub fn hole(bounds: Aabb) -> Self {
        Self {
            kind: HazardKind::Hole,
            bounds,
            covered: false,
        }
    }

    pub fn is_open(&self) -> bool {
        match self.kind {
            HazardKind::Cliff => true,
            HazardKind::Hole => !self.covered,
        }
    }
}

/// Collection of hazard zones
#[derive(Debug, Clone, Default)]
pub struct HazardMap {
    zones: Vec<HazardZone>,
}

impl HazardMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: HazardZone) -> usize {
        self.zones.push(zone);
        self.zones.len() - 1
    }

    /// Permanently cover a hole; returns false for cliffs or unknown indices
    pub fn cover_hole(&mut self, index: usize) -> bool {
        match self.zones.get_mut(index) {
            Some(zone) if zone.kind == HazardKind::Hole => {
                if !zone.covered {
                    tracing::debug!("hole {} covered", index);
                }
                zone.covered = true;
                true
            }
            _ => false,
        }
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }
}

impl TerrainHazards for HazardMap {
    fn is_hazardous(&self, point: Vec2) -> bool {
        self.zones.iter().any(|zone| zone.is_open() && zone.bounds.contains(point))
    }

    fn hazard_center(&self, point: Vec2) -> Option<Vec2> {
        self.zones
            .iter()
            .find(|zone| zone.is_open() && zone.bounds.contains(point))
            .map(|zone| zone.bounds.center())
    }
}
