//! Time system constants. All durations are world-clock milliseconds.

/// Interval between two stamina drain/regeneration steps
pub const PLAYER_STAMINA_TICK: u64 = 50;
/// Interval between two health regeneration steps
pub const PLAYER_HEALTH_REGENERATE_DELAY: u64 = 100;
/// Delay before a picked-up coin reappears elsewhere
pub const COINS_RESPAWN_DELAY: u64 = 30_000;
/// Longest single tick the simulation accepts; longer frames are clamped
pub const MAX_TICK_DELTA: u64 = 100;
