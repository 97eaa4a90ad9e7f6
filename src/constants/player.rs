//! Player skill and stamina constants.

/// Highest level any skill can reach
pub const PLAYER_MAX_SKILL_LEVEL: u32 = 10;
/// Stamina drained per stamina tick while moving
pub const PLAYER_STAMINA_DRAIN: f32 = 0.2;
/// Fraction of max stamina restored per stamina tick while idle
pub const PLAYER_STAMINA_REGEN_RATE: f32 = 0.04;
/// Lower bound of the regeneration scale near empty stamina
pub const PLAYER_STAMINA_REGEN_FLOOR: f32 = 0.1;
/// Speed divisor when stamina is exhausted
pub const PLAYER_EXHAUSTED_SPEED_DIVISOR: f32 = 1.5;
