//! Level file model for the headless runner
//!
//! Levels are TOML. Positions are `[x, y]` arrays and times are seconds
//! from the start of the run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, StealthError};
use crate::core::types::{Facing, Vec2};
use crate::spatial::raycast::Aabb;
use crate::world::hazards::{HazardKind, HazardZone};
use crate::world::mode::WorldMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub name: String,
    /// Steps to run when the command line does not say
    pub ticks: Option<u64>,
    pub player: PlayerScriptDef,
    pub guards: Vec<GuardDef>,
    pub obstacles: Vec<BoxDef>,
    pub hazards: Vec<HazardDef>,
    pub lures: Vec<LureDef>,
    pub spawners: Vec<SpawnerDef>,
    pub mode_switches: Vec<ModeSwitchDef>,
    pub alerts: Vec<AlertDef>,
    pub covers: Vec<CoverDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardDef {
    pub position: Vec2,
    #[serde(default)]
    pub group: u32,
    #[serde(default)]
    pub facing: Facing,
    /// Per-guard overrides of the sensor config
    pub vision_range: Option<f32>,
    pub vision_angle: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoxDef {
    pub fn to_aabb(self) -> Aabb {
        Aabb::new(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub kind: HazardKind,
    pub min: Vec2,
    pub max: Vec2,
    #[serde(default)]
    pub covered: bool,
}

impl HazardDef {
    pub fn to_zone(self) -> HazardZone {
        let bounds = Aabb::new(self.min, self.max);
        let mut zone = match self.kind {
            HazardKind::Cliff => HazardZone::cliff(bounds),
            HazardKind::Hole => HazardZone::hole(bounds),
        };
        zone.covered = self.covered;
        zone
    }
}

/// A lure lying at `position`, optionally thrown to `land_at` at `activate_at`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LureDef {
    pub position: Vec2,
    pub activate_at: Option<f32>,
    pub land_at: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerDef {
    pub drop_point: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSwitchDef {
    pub at: f32,
    pub mode: WorldMode,
}

/// Scripted alert for a whole group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertDef {
    pub at: f32,
    pub group: u32,
}

/// Cover the hazard at `hazard` (index into `hazards`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverDef {
    pub at: f32,
    pub hazard: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointDef {
    pub at: f32,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowDef {
    pub from: f32,
    pub to: f32,
}

impl WindowDef {
    pub fn contains(&self, t: f32) -> bool {
        t >= self.from && t < self.to
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerScriptDef {
    /// Without waypoints there is no player in the level
    pub waypoints: Vec<WaypointDef>,
    pub hide: Vec<WindowDef>,
    pub fall: Vec<WindowDef>,
    /// Collider radius used for line-of-sight rays
    pub radius: Option<f32>,
}

impl ScenarioFile {
    /// Reject content the runner cannot make sense of
    pub fn validate(&self) -> Result<()> {
        let waypoints = &self.player.waypoints;
        if waypoints.windows(2).any(|w| w[1].at < w[0].at) {
            return Err(StealthError::InvalidScenario(
                "player waypoints must be in time order".to_string(),
            ));
        }

        for window in self.player.hide.iter().chain(&self.player.fall) {
            if window.to < window.from {
                return Err(StealthError::InvalidScenario(format!(
                    "window ends before it starts ({} > {})",
                    window.from, window.to
                )));
            }
        }

        for cover in &self.covers {
            match self.hazards.get(cover.hazard) {
                Some(h) if h.kind == HazardKind::Hole => {}
                Some(_) => {
                    return Err(StealthError::InvalidScenario(format!(
                        "hazard {} is a cliff and cannot be covered",
                        cover.hazard
                    )))
                }
                None => {
                    return Err(StealthError::InvalidScenario(format!(
                        "cover refers to missing hazard {}",
                        cover.hazard
                    )))
                }
            }
        }

        if let Some(lure) = self.lures.iter().find(|l| l.land_at.is_some() && l.activate_at.is_none()) {
            return Err(StealthError::InvalidScenario(format!(
                "lure at ({}, {}) has a landing point but no activation time",
                lure.position.x, lure.position.y
            )));
        }

        Ok(())
    }
}

pub fn parse_scenario(content: &str) -> Result<ScenarioFile> {
    let scenario: ScenarioFile = toml::from_str(content)?;
    scenario.validate()?;
    Ok(scenario)
}

pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioFile> {
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}
