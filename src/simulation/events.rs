//! Events produced by the fixed step

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::{GroupId, GuardId, LureId, Vec2};
use crate::world::mode::WorldMode;

/// How the session ended, if it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    #[display(fmt = "ongoing")]
    Ongoing,
    #[display(fmt = "caught by {}", by)]
    Caught { by: GuardId },
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// The shared meter filled; one per fill cycle
    FullDetection { source: GuardId },
    GroupAlerted { group: GroupId, chasing: Vec<GuardId> },
    /// A single guard was sent chasing by contact or script
    GuardAlerted { guard: GuardId },
    ModeChanged { from: WorldMode, to: WorldMode },
    CorruptionMaxed,
    LurePulsed { lure: LureId, position: Vec2 },
    GuardLured { guard: GuardId, lure: LureId },
    /// Lured guard finished lingering and went back to wandering
    GuardReleased { guard: GuardId },
    LureExpired { lure: LureId },
    LureSpawned { lure: LureId },
    /// Chasing guard gave up because the player hid or fell
    PlayerLost { guard: GuardId },
    PlayerCaught { guard: GuardId },
    GuardFell { guard: GuardId },
    GuardRemoved { guard: GuardId },
    GameOver { outcome: GameOutcome },
}
