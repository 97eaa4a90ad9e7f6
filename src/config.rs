//! Session configuration.
//!
//! Compile-time defaults live in `constants`; `GameConfig` carries the
//! subset a session may override, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Balance values for player, enemies and economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    pub player_attack_damage: f32,
    pub player_attack_damage_growth: f32,
    pub player_attack_damage_coins_to_upgrade: f32,
    pub player_attack_distance: f32,
    pub player_attack_distance_growth: f32,
    pub player_attack_distance_coins_to_upgrade: f32,
    pub player_attack_need_stamina: f32,
    pub player_health: f32,
    pub player_health_growth: f32,
    pub player_health_coins_to_upgrade: f32,
    pub player_health_regenerate_multiplier: f32,
    pub player_speed: f32,
    pub player_speed_growth: f32,
    pub player_speed_coins_to_upgrade: f32,
    pub player_stamina: f32,
    pub player_stamina_growth: f32,
    pub player_stamina_coins_to_upgrade: f32,
    pub player_coins_to_upgrade_growth: f32,

    pub coins_count: usize,
    pub coins_size: u32,

    pub enemy_count: usize,
    pub enemy_health: f32,
    pub enemy_health_growth: f32,
    pub enemy_health_growth_retardation_level: u32,
    pub enemy_armor: f32,
    pub enemy_armor_growth: f32,
    pub enemy_armor_growth_retardation_level: u32,
    pub enemy_speed: f32,
    pub enemy_speed_growth: f32,
    pub enemy_speed_growth_max_level: u32,
    pub enemy_damage: f32,
    pub enemy_damage_growth: f32,

    pub spawner_enemy_level_growth: f32,
    pub spawner_enemy_level_growth_retardation_level: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            player_attack_damage: PLAYER_ATTACK_DAMAGE,
            player_attack_damage_growth: PLAYER_ATTACK_DAMAGE_GROWTH,
            player_attack_damage_coins_to_upgrade: PLAYER_ATTACK_DAMAGE_COINS_TO_UPGRADE,
            player_attack_distance: PLAYER_ATTACK_DISTANCE,
            player_attack_distance_growth: PLAYER_ATTACK_DISTANCE_GROWTH,
            player_attack_distance_coins_to_upgrade: PLAYER_ATTACK_DISTANCE_COINS_TO_UPGRADE,
            player_attack_need_stamina: PLAYER_ATTACK_NEED_STAMINA,
            player_health: PLAYER_HEALTH,
            player_health_growth: PLAYER_HEALTH_GROWTH,
            player_health_coins_to_upgrade: PLAYER_HEALTH_COINS_TO_UPGRADE,
            player_health_regenerate_multiplier: PLAYER_HEALTH_REGENERATE_MULTIPLIER,
            player_speed: PLAYER_SPEED,
            player_speed_growth: PLAYER_SPEED_GROWTH,
            player_speed_coins_to_upgrade: PLAYER_SPEED_COINS_TO_UPGRADE,
            player_stamina: PLAYER_STAMINA,
            player_stamina_growth: PLAYER_STAMINA_GROWTH,
            player_stamina_coins_to_upgrade: PLAYER_STAMINA_COINS_TO_UPGRADE,
            player_coins_to_upgrade_growth: PLAYER_COINS_TO_UPGRADE_GROWTH,
            coins_count: COINS_COUNT,
            coins_size: COINS_SIZE,
            enemy_count: ENEMY_COUNT,
            enemy_health: ENEMY_HEALTH,
            enemy_health_growth: ENEMY_HEALTH_GROWTH,
            enemy_health_growth_retardation_level: ENEMY_HEALTH_GROWTH_RETARDATION_LEVEL,
            enemy_armor: ENEMY_ARMOR,
            enemy_armor_growth: ENEMY_ARMOR_GROWTH,
            enemy_armor_growth_retardation_level: ENEMY_ARMOR_GROWTH_RETARDATION_LEVEL,
            enemy_speed: ENEMY_SPEED,
            enemy_speed_growth: ENEMY_SPEED_GROWTH,
            enemy_speed_growth_max_level: ENEMY_SPEED_GROWTH_MAX_LEVEL,
            enemy_damage: ENEMY_DAMAGE,
            enemy_damage_growth: ENEMY_DAMAGE_GROWTH,
            spawner_enemy_level_growth: SPAWNER_ENEMY_LEVEL_GROWTH,
            spawner_enemy_level_growth_retardation_level:
                SPAWNER_ENEMY_LEVEL_GROWTH_RETARDATION_LEVEL,
        }
    }
}

/// Spawner placement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub positions_grid: usize,
    pub min_space_between: f32,
    pub retry_delay: u64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            positions_grid: SPAWNER_POSITIONS_GRID,
            min_space_between: SPAWNER_MIN_SPACE_BETWEEN,
            retry_delay: SPAWNER_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for map generation and every random pick of the session
    pub seed: u64,
    pub map_size: usize,
    /// Percentage of scenery-eligible tiles that get decorated
    pub scenery_density: f32,
    /// Node expansions the navigator may spend per tick
    pub path_budget: usize,
    pub difficulty: Difficulty,
    pub spawner: SpawnerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            map_size: LEVEL_MAP_SIZE,
            scenery_density: SCENERY_DENSITY,
            path_budget: 4000,
            difficulty: Difficulty::default(),
            spawner: SpawnerConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size < 8 {
            return Err(ConfigError::Invalid(format!(
                "map_size must be at least 8, got {}",
                self.map_size
            )));
        }
        if self.path_budget == 0 {
            return Err(ConfigError::Invalid("path_budget must be positive".into()));
        }
        if self.spawner.positions_grid == 0 {
            return Err(ConfigError::Invalid(
                "spawner.positions_grid must be positive".into(),
            ));
        }
        if self.spawner.retry_delay == 0 {
            return Err(ConfigError::Invalid(
                "spawner.retry_delay must be positive".into(),
            ));
        }
        Ok(())
    }
}
