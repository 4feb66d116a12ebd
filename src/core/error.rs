use thiserror::Error;

use crate::core::types::{GuardId, LureId};

#[derive(Error, Debug)]
pub enum StealthError {
    #[error("Guard not found: {0}")]
    GuardNotFound(GuardId),

    #[error("Lure not found: {0}")]
    LureNotFound(LureId),

    #[error("World mode is locked: corruption is at maximum")]
    ModeLocked,

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StealthError>;
