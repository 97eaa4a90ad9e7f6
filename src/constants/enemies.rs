//! NPC behavior and enemy variant constants.

/// Minimum interval between two path requests of one NPC (ms)
pub const NPC_PATH_FIND_RATE: u64 = 500;
/// A waypoint closer than this counts as reached (px)
pub const NPC_WAYPOINT_REACH: f32 = 4.0;
/// Isometric distance at which a pursuing enemy stops pathing and holds (px)
pub const ENEMY_PATH_BREAKPOINT: f32 = 32.0;
/// Matrix distance that first triggers an enemy's pursuit (tiles)
pub const ENEMY_PURSUIT_TRIGGER_DISTANCE: f32 = 14.0;
/// Isometric distance at which an enemy touches the player (px)
pub const ENEMY_CONTACT_DISTANCE: f32 = 16.0;
/// Self-freeze applied after a melee hit (ms)
pub const ENEMY_ATTACK_COOLDOWN: u64 = 1000;
/// Speed multiplier while frozen
pub const FREEZE_SPEED_FACTOR: f32 = 0.2;
/// Time a dead enemy lingers before removal (ms)
pub const DEATH_DECAY_DURATION: u64 = 250;

/// Berserk self-heal fraction of max health
pub const ENEMY_HEAL_MULTIPLIER: f32 = 0.05;
/// Berserk self-heal interval (ms)
pub const ENEMY_HEAL_DELAY: u64 = 1000;

/// Explosive death blast radius (px, isometric)
pub const ENEMY_EXPLOSION_RADIUS: f32 = 80.0;

/// Telepath heal-share radius (px, isometric)
pub const ENEMY_REGENERATION_RADIUS: f32 = 100.0;
/// How long the telepath area stays visible after sharing (ms)
pub const ENEMY_REGENERATION_EFFECT_DURATION: u64 = 500;

/// World offsets of the adherents a dying stranger leaves behind
pub const STRANGER_ADHERENT_OFFSETS: [(f32, f32); 3] = [(0.0, -10.0), (5.0, 5.0), (-5.0, 5.0)];

/// Subsampling step of the cached spawn candidates
pub const SPAWNER_POSITIONS_GRID: usize = 2;
/// Minimum matrix distance between a new enemy and any living one (tiles)
pub const SPAWNER_MIN_SPACE_BETWEEN: f32 = 6.0;
/// Delay before retrying a spawn that found no candidate (ms)
pub const SPAWNER_RETRY_DELAY: u64 = 2000;
