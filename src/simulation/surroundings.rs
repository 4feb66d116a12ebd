//! Read-only view of the collaborators a step depends on

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::spatial::raycast::{OpenField, SpatialQuery};
use crate::world::hazards::{SafeGround, TerrainHazards};

/// What the core knows about the player on this step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec2,
    /// Inside a hiding spot
    #[serde(default)]
    pub hidden: bool,
    /// Falling into a cliff or hole
    #[serde(default)]
    pub falling: bool,
}

impl PlayerView {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            hidden: false,
            falling: false,
        }
    }

    pub fn hidden_at(position: Vec2) -> Self {
        Self {
            position,
            hidden: true,
            falling: false,
        }
    }

    /// Guards can neither see nor keep chasing a concealed player
    pub fn is_concealed(&self) -> bool {
        self.hidden || self.falling
    }
}

/// Collaborators for one fixed step
#[derive(Clone, Copy)]
pub struct Surroundings<'a> {
    pub player: Option<PlayerView>,
    pub spatial: &'a dyn SpatialQuery,
    pub hazards: &'a dyn TerrainHazards,
}

impl<'a> Surroundings<'a> {
    pub fn new(player: Option<PlayerView>, spatial: &'a dyn SpatialQuery, hazards: &'a dyn TerrainHazards) -> Self {
        Self {
            player,
            spatial,
            hazards,
        }
    }
}

impl Surroundings<'static> {
    /// Open ground with no walls or hazards
    pub fn open(player: Option<PlayerView>) -> Self {
        Self {
            player,
            spatial: &OpenField,
            hazards: &SafeGround,
        }
    }
}
