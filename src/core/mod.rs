pub mod config;
pub mod error;
pub mod types;

pub use config::StealthConfig;
pub use error::{Result, StealthError};
pub use types::{Facing, GroupId, GuardId, LureId, Tick, Vec2};
