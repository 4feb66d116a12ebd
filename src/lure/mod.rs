//! Lures and the spawners that replace them

pub mod attractor;
pub mod spawner;

pub use attractor::{LureAttractor, LureTick};
pub use spawner::LureSpawner;
