//! World-level state shared by every guard: the current mode and the ground

pub mod hazards;
pub mod mode;

pub use hazards::{HazardKind, HazardMap, HazardZone, SafeGround, TerrainHazards};
pub use mode::{CorruptionTick, ModeChange, WorldMode, WorldModeController};
