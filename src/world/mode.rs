//! World mode (real / spirit) and the corruption cost of the spirit world
//!
//! The controller is the only owner allowed to change the mode. It returns a
//! [`ModeChange`] value instead of calling listeners; the simulation context
//! applies the change to the meter and every guard in the same tick.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::config::CorruptionConfig;
use crate::core::error::{Result, StealthError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum WorldMode {
    #[default]
    RealWorld,
    SpiritWorld,
}

impl WorldMode {
    pub fn other(self) -> Self {
        match self {
            WorldMode::RealWorld => WorldMode::SpiritWorld,
            WorldMode::SpiritWorld => WorldMode::RealWorld,
        }
    }
}

/// Notification that the mode switched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    pub from: WorldMode,
    pub to: WorldMode,
}

/// Outcome of advancing corruption by one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorruptionTick {
    /// Forced return to the real world
    pub forced: Option<ModeChange>,
    /// Corruption reached its maximum on this step
    pub maxed: bool,
}

#[derive(Debug, Clone)]
pub struct WorldModeController {
    mode: WorldMode,
    corruption: f32,
    max_corruption: f32,
    per_second: f32,
    fully_corrupted: bool,
}

impl WorldModeController {
    pub fn new(config: &CorruptionConfig) -> Self {
        Self {
            mode: WorldMode::RealWorld,
            corruption: 0.0,
            max_corruption: config.max_corruption.max(f32::EPSILON),
            per_second: config.per_second.max(0.0),
            fully_corrupted: false,
        }
    }

    pub fn mode(&self) -> WorldMode {
        self.mode
    }

    pub fn is_spirit_world(&self) -> bool {
        self.mode == WorldMode::SpiritWorld
    }

    pub fn corruption(&self) -> f32 {
        self.corruption
    }

    pub fn corruption_normalized(&self) -> f32 {
        self.corruption / self.max_corruption
    }

    pub fn is_fully_corrupted(&self) -> bool {
        self.fully_corrupted
    }

    /// Switch to `target`
    ///
    /// Returns `Ok(None)` when already in that mode. Entering the spirit world
    /// is refused once corruption has maxed out.
    pub fn request(&mut self, target: WorldMode) -> Result<Option<ModeChange>> {
        if target == self.mode {
            return Ok(None);
        }
        if target == WorldMode::SpiritWorld && self.fully_corrupted {
            return Err(StealthError::ModeLocked);
        }
        Ok(Some(self.switch_to(target)))
    }

    pub fn toggle(&mut self) -> Result<Option<ModeChange>> {
        self.request(self.mode.other())
    }

    /// Accumulate corruption while in the spirit world
    pub fn tick(&mut self, dt: f32) -> CorruptionTick {
        if self.mode != WorldMode::SpiritWorld {
            return CorruptionTick::default();
        }

        self.corruption = (self.corruption + self.per_second * dt).min(self.max_corruption);

        if self.corruption >= self.max_corruption && !self.fully_corrupted {
            self.fully_corrupted = true;
            tracing::info!("corruption maxed, forcing real world");
            return CorruptionTick {
                forced: Some(self.switch_to(WorldMode::RealWorld)),
                maxed: true,
            };
        }

        CorruptionTick::default()
    }

    fn switch_to(&mut self, target: WorldMode) -> ModeChange {
        let change = ModeChange {
            from: self.mode,
            to: target,
        };
        self.mode = target;
        tracing::info!("world mode {} -> {}", change.from, change.to);
        change
    }
}
