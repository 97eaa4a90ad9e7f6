//! Error types for the simulation core.
//!
//! Each concern gets its own enum so callers can match on what they can
//! actually recover from.

use thiserror::Error;

/// A sprite could not be constructed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpriteError {
    #[error("invalid sprite position: neither a world nor a matrix position was given")]
    MissingPosition,
}

/// A tile could not be placed into the level.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TileError {
    #[error("tile cell ({x}, {y}, {z}) is already occupied")]
    Occupied { x: i32, y: i32, z: usize },
    #[error("tile cell ({x}, {y}, {z}) is outside the level")]
    OutOfBounds { x: i32, y: i32, z: usize },
}

/// A player action was refused. The display text is the user-facing notice.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ActionError {
    #[error("Not enough coins")]
    NotEnoughCoins { need: u32, have: u32 },
    #[error("Not enough stamina")]
    NotEnoughStamina { need: f32, have: f32 },
    #[error("Maximum level reached")]
    MaxLevel,
    #[error("Player is dead")]
    PlayerDead,
}

/// A per-entity update failed. The tick logs it and moves on.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Component(#[from] hecs::ComponentError),
}

/// A session could not be set up.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("the generated level has no free tile for the player")]
    NoPlayerSpawn,
    #[error(transparent)]
    Sprite(#[from] SpriteError),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
