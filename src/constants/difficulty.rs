//! Base values and growth rates for player, enemy and economy progression.
//!
//! These are the defaults of `config::Difficulty`; a session may override them.

// PLAYER
/// Base melee damage
pub const PLAYER_ATTACK_DAMAGE: f32 = 20.0;
pub const PLAYER_ATTACK_DAMAGE_GROWTH: f32 = 0.4;
pub const PLAYER_ATTACK_DAMAGE_COINS_TO_UPGRADE: f32 = 20.0;
/// Base melee reach in pixels (isometric distance)
pub const PLAYER_ATTACK_DISTANCE: f32 = 100.0;
pub const PLAYER_ATTACK_DISTANCE_GROWTH: f32 = 0.4;
pub const PLAYER_ATTACK_DISTANCE_COINS_TO_UPGRADE: f32 = 15.0;
/// Stamina spent by one attack
pub const PLAYER_ATTACK_NEED_STAMINA: f32 = 10.0;
pub const PLAYER_HEALTH: f32 = 100.0;
pub const PLAYER_HEALTH_GROWTH: f32 = 0.4;
pub const PLAYER_HEALTH_COINS_TO_UPGRADE: f32 = 20.0;
/// Fraction of max health restored per regeneration step
pub const PLAYER_HEALTH_REGENERATE_MULTIPLIER: f32 = 0.005;
/// Movement speed in pixels per second
pub const PLAYER_SPEED: f32 = 90.0;
pub const PLAYER_SPEED_GROWTH: f32 = 0.0556;
pub const PLAYER_SPEED_COINS_TO_UPGRADE: f32 = 20.0;
pub const PLAYER_STAMINA: f32 = 100.0;
pub const PLAYER_STAMINA_GROWTH: f32 = 0.2;
pub const PLAYER_STAMINA_COINS_TO_UPGRADE: f32 = 10.0;
/// Quadratic growth of every upgrade cost
pub const PLAYER_COINS_TO_UPGRADE_GROWTH: f32 = 1.0;

// COINS
/// Coin pickups present on the map at once
pub const COINS_COUNT: usize = 20;
/// Coins granted by one pickup
pub const COINS_SIZE: u32 = 4;

// ENEMIES
/// Enemies alive at once
pub const ENEMY_COUNT: usize = 20;
pub const ENEMY_HEALTH: f32 = 60.0;
pub const ENEMY_HEALTH_GROWTH: f32 = 0.35;
pub const ENEMY_HEALTH_GROWTH_RETARDATION_LEVEL: u32 = 12;
pub const ENEMY_ARMOR: f32 = 60.0;
pub const ENEMY_ARMOR_GROWTH: f32 = 0.35;
pub const ENEMY_ARMOR_GROWTH_RETARDATION_LEVEL: u32 = 12;
/// Enemy speed in pixels per second
pub const ENEMY_SPEED: f32 = 60.0;
pub const ENEMY_SPEED_GROWTH: f32 = 0.06;
pub const ENEMY_SPEED_GROWTH_MAX_LEVEL: u32 = 15;
pub const ENEMY_DAMAGE: f32 = 90.0;
pub const ENEMY_DAMAGE_GROWTH: f32 = 0.32;

// SPAWNER
/// Quadratic growth of the enemy level per lived minute
pub const SPAWNER_ENEMY_LEVEL_GROWTH: f32 = 0.05;
/// Minute after which enemy level growth is damped
pub const SPAWNER_ENEMY_LEVEL_GROWTH_RETARDATION_LEVEL: u32 = 10;
