//! Sensor model - what a guard sees of the player
//!
//! Range, cone and obstruction tests run in that order; the first failing
//! test ends the evaluation. A successful sighting is then weighted by a
//! distance band and by how far off-center the player stands.

use serde::{Deserialize, Serialize};

use crate::core::config::SensorConfig;
use crate::core::types::Vec2;
use crate::simulation::surroundings::PlayerView;
use crate::spatial::raycast::{ColliderTag, SpatialQuery};

/// Distance band the player falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeBand {
    Close,
    Mid,
    Far,
}

/// A successful line-of-sight check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub distance: f32,
    /// Degrees between the guard's facing and the direction to the player
    pub angle: f32,
}

/// Why a sight check failed (useful for debugging and tests)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightBlock {
    NoPlayer,
    Concealed,
    OutOfRange,
    OutsideCone,
    Obstructed,
}

/// Angle in degrees between two directions
///
/// Returns 0 when either vector is degenerate, so a player standing exactly
/// on the guard counts as straight ahead.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < 1e-12 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Per-guard perception
#[derive(Debug, Clone, PartialEq)]
pub struct SensorModel {
    config: SensorConfig,
}

impl SensorModel {
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Full sight check, reporting the failing stage
    pub fn evaluate(
        &self,
        origin: Vec2,
        facing: Vec2,
        player: Option<&PlayerView>,
        spatial: &dyn SpatialQuery,
    ) -> Result<Sighting, SightBlock> {
        let player = player.ok_or(SightBlock::NoPlayer)?;
        if player.is_concealed() {
            return Err(SightBlock::Concealed);
        }

        let to_player = player.position - origin;
        let distance = to_player.length();
        if distance > self.config.vision_range {
            return Err(SightBlock::OutOfRange);
        }

        let direction = to_player.normalize_or_zero();
        let angle = angle_between(facing, direction);
        if angle > self.config.vision_angle {
            return Err(SightBlock::OutsideCone);
        }

        if let Some(hit) = spatial.raycast(origin, direction, distance, self.config.obstruction_mask) {
            if hit.tag != ColliderTag::Player {
                return Err(SightBlock::Obstructed);
            }
        }

        Ok(Sighting { distance, angle })
    }

    /// Line of sight to the player, if any
    pub fn sense(
        &self,
        origin: Vec2,
        facing: Vec2,
        player: Option<&PlayerView>,
        spatial: &dyn SpatialQuery,
    ) -> Option<Sighting> {
        self.evaluate(origin, facing, player, spatial).ok()
    }

    pub fn band(&self, distance: f32) -> RangeBand {
        if distance <= self.config.close_range {
            RangeBand::Close
        } else if distance <= self.config.mid_range {
            RangeBand::Mid
        } else {
            RangeBand::Far
        }
    }

    /// Linear falloff from 1.0 straight ahead to the edge factor at the cone edge
    pub fn angle_factor(&self, angle: f32) -> f32 {
        let t = if self.config.vision_angle > 0.0 {
            (angle / self.config.vision_angle).clamp(0.0, 1.0)
        } else {
            1.0
        };
        1.0 + (self.config.edge_angle_factor - 1.0) * t
    }

    /// Band base contribution times angle factor
    pub fn contribution(&self, sighting: &Sighting) -> f32 {
        let base = match self.band(sighting.distance) {
            RangeBand::Close => self.config.close_contribution,
            RangeBand::Mid => self.config.mid_contribution,
            RangeBand::Far => self.config.far_contribution,
        };
        base * self.angle_factor(sighting.angle)
    }

    /// Meter units this sighting adds over `dt` seconds
    pub fn detection_amount(&self, sighting: &Sighting, dt: f32) -> f32 {
        self.contribution(sighting) * self.config.detection_speed * dt
    }
}
