use thiserror::Error;

use crate::core::types::{CivId, Position};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Civilization limit reached: at most {max} civilizations may be active")]
    CapacityReached { max: usize },

    #[error("Civilization not found: {0}")]
    UnknownCivilization(CivId),

    #[error("Cannot settle at {0}: outside the map or not settleable land")]
    InvalidPosition(Position),

    #[error("World dimensions mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (i32, i32),
        found: (i32, i32),
    },

    #[error("Civilization {civ} is in an inconsistent state: {reason}")]
    CorruptState { civ: CivId, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
