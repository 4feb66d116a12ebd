//! Fixed-step simulation context and its inputs/outputs

pub mod context;
pub mod events;
pub mod surroundings;

pub use context::StealthSim;
pub use events::{GameOutcome, SimulationEvent};
pub use surroundings::{PlayerView, Surroundings};
