//! Data-driven entity spawning.
//!
//! Enemy variants differ only by their stat multipliers here; their special
//! behavior lives in `systems::variants`. Adding a variant means adding a
//! `VariantDef` and a match arm, not touching the spawn code.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{
    Coin, Collider, Enemy, EnemyVariant, EntityKind, Facing, Npc, Player, Position, Speed,
    VariantState, Velocity,
};
use crate::config::Difficulty;
use crate::constants::*;
use crate::coords::MatrixPosition;
use crate::error::SpriteError;
use crate::live::Live;
use crate::progression::{
    progression_linear, progression_quadratic, LinearProgression, QuadraticProgression,
};

/// Where a new sprite appears. At least one of the two must be set; the
/// world position wins when both are.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteData {
    pub position_at_world: Option<Vec2>,
    pub position_at_matrix: Option<MatrixPosition>,
}

impl SpriteData {
    pub fn at_world(world: Vec2) -> Self {
        Self {
            position_at_world: Some(world),
            position_at_matrix: None,
        }
    }

    pub fn at_matrix(matrix: MatrixPosition) -> Self {
        Self {
            position_at_world: None,
            position_at_matrix: Some(matrix),
        }
    }

    pub fn resolve(&self) -> Result<Position, SpriteError> {
        match (self.position_at_world, self.position_at_matrix) {
            (Some(world), _) => Ok(Position::at_world(world)),
            (None, Some(matrix)) => Ok(Position::at_matrix(matrix)),
            (None, None) => Err(SpriteError::MissingPosition),
        }
    }
}

// =============================================================================
// ENEMIES
// =============================================================================

/// Stat multipliers of an enemy variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantDef {
    /// Display name (for logs)
    pub name: &'static str,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
}

/// Predefined variant multipliers
pub mod variants {
    use super::VariantDef;

    pub const ADHERENT: VariantDef = VariantDef {
        name: "Adherent",
        health: 0.8,
        damage: 0.6,
        speed: 1.0,
    };

    pub const BERSERK: VariantDef = VariantDef {
        name: "Berserk",
        health: 2.0,
        damage: 1.0,
        speed: 0.7,
    };

    pub const BOSS: VariantDef = VariantDef {
        name: "Boss",
        health: 8.0,
        damage: 1.0,
        speed: 0.5,
    };

    pub const DEMON: VariantDef = VariantDef {
        name: "Demon",
        health: 0.6,
        damage: 0.3,
        speed: 0.8,
    };

    pub const EXPLOSIVE: VariantDef = VariantDef {
        name: "Explosive",
        health: 1.2,
        damage: 0.4,
        speed: 0.5,
    };

    pub const GHOST: VariantDef = VariantDef {
        name: "Ghost",
        health: 1.5,
        damage: 0.7,
        speed: 0.8,
    };

    pub const RISPER: VariantDef = VariantDef {
        name: "Risper",
        health: 0.9,
        damage: 0.5,
        speed: 1.1,
    };

    pub const SPIKE: VariantDef = VariantDef {
        name: "Spike",
        health: 1.1,
        damage: 0.4,
        speed: 0.8,
    };

    pub const STRANGER: VariantDef = VariantDef {
        name: "Stranger",
        health: 1.5,
        damage: 0.8,
        speed: 0.7,
    };

    pub const TANK: VariantDef = VariantDef {
        name: "Tank",
        health: 1.8,
        damage: 0.6,
        speed: 0.7,
    };

    pub const TELEPATH: VariantDef = VariantDef {
        name: "Telepath",
        health: 1.5,
        damage: 1.0,
        speed: 0.8,
    };

    pub const UNDEAD: VariantDef = VariantDef {
        name: "Undead",
        health: 1.5,
        damage: 0.5,
        speed: 0.7,
    };
}

pub fn variant_def(variant: EnemyVariant) -> &'static VariantDef {
    match variant {
        EnemyVariant::Adherent => &variants::ADHERENT,
        EnemyVariant::Berserk => &variants::BERSERK,
        EnemyVariant::Boss => &variants::BOSS,
        EnemyVariant::Demon => &variants::DEMON,
        EnemyVariant::Explosive => &variants::EXPLOSIVE,
        EnemyVariant::Ghost => &variants::GHOST,
        EnemyVariant::Risper => &variants::RISPER,
        EnemyVariant::Spike => &variants::SPIKE,
        EnemyVariant::Stranger => &variants::STRANGER,
        EnemyVariant::Tank => &variants::TANK,
        EnemyVariant::Telepath => &variants::TELEPATH,
        EnemyVariant::Undead => &variants::UNDEAD,
    }
}

/// Level-scaled stats of one enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub armor: f32,
    pub speed: f32,
    pub damage: f32,
}

pub fn enemy_stats(difficulty: &Difficulty, variant: EnemyVariant, level: u32) -> EnemyStats {
    let def = variant_def(variant);

    let health = progression_quadratic(QuadraticProgression {
        default_value: difficulty.enemy_health * def.health,
        scale: difficulty.enemy_health_growth,
        level,
        retardation_level: Some(difficulty.enemy_health_growth_retardation_level),
        ..Default::default()
    });
    let speed = progression_linear(LinearProgression {
        default_value: difficulty.enemy_speed * def.speed,
        scale: difficulty.enemy_speed_growth,
        level,
        max_level: Some(difficulty.enemy_speed_growth_max_level),
        ..Default::default()
    });
    let damage = progression_linear(LinearProgression {
        default_value: difficulty.enemy_damage * def.damage,
        scale: difficulty.enemy_damage_growth,
        level,
        ..Default::default()
    });

    // Only tanks wear armor
    let armor = if variant == EnemyVariant::Tank {
        progression_quadratic(QuadraticProgression {
            default_value: difficulty.enemy_armor,
            scale: difficulty.enemy_armor_growth,
            level,
            retardation_level: Some(difficulty.enemy_armor_growth_retardation_level),
            ..Default::default()
        })
    } else {
        0.0
    };

    EnemyStats {
        health,
        armor,
        speed,
        damage,
    }
}

/// Spawn an enemy of `variant` at `level`
pub fn spawn_enemy(
    world: &mut World,
    difficulty: &Difficulty,
    now: u64,
    variant: EnemyVariant,
    level: u32,
    data: SpriteData,
) -> Result<Entity, SpriteError> {
    let position = data.resolve()?;
    let stats = enemy_stats(difficulty, variant, level);

    let state = match variant {
        EnemyVariant::Berserk => VariantState::Berserk {
            heal_at: now + ENEMY_HEAL_DELAY,
        },
        EnemyVariant::Telepath => VariantState::Telepath { area: None },
        _ => VariantState::None,
    };

    let mut npc = Npc::new(ENEMY_PATH_BREAKPOINT);
    npc.needs_pursuit_trigger = true;

    Ok(world.spawn((
        EntityKind::Enemy,
        position,
        Velocity::default(),
        Speed(stats.speed),
        Facing::default(),
        Collider::WALKER,
        npc,
        Enemy {
            variant,
            level,
            damage: stats.damage,
            overlap_target: false,
            state,
        },
        Live::new(stats.health).with_armor(stats.armor),
    )))
}

// =============================================================================
// PLAYER & PICKUPS
// =============================================================================

/// Spawn the player with base stats and the persisted coin balance
pub fn spawn_player(
    world: &mut World,
    difficulty: &Difficulty,
    coins: u32,
    data: SpriteData,
) -> Result<Entity, SpriteError> {
    let position = data.resolve()?;

    Ok(world.spawn((
        EntityKind::Player,
        position,
        Velocity::default(),
        Speed(difficulty.player_speed),
        Facing::default(),
        Collider::PLAYER,
        Player::new(coins, difficulty.player_stamina, position.matrix),
        Live::new(difficulty.player_health),
    )))
}

pub fn spawn_coin_entity(world: &mut World, amount: u32, matrix: MatrixPosition) -> Entity {
    world.spawn((EntityKind::Coin, Position::at_matrix(matrix), Coin { amount }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_without_position_is_rejected() {
        let mut world = World::new();
        let result = spawn_enemy(
            &mut world,
            &Difficulty::default(),
            0,
            EnemyVariant::Demon,
            1,
            SpriteData::default(),
        );
        assert_eq!(result, Err(SpriteError::MissingPosition));
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_world_position_wins_over_matrix() {
        let data = SpriteData {
            position_at_world: Some(Vec2::new(0.0, 24.0)),
            position_at_matrix: Some(MatrixPosition::new(9, 9)),
        };
        let position = data.resolve().unwrap();
        assert_eq!(position.matrix, MatrixPosition::new(1, 1));
    }

    #[test]
    fn test_tank_level_5_armor_absorbs_small_hits() {
        let difficulty = Difficulty::default();
        let mut world = World::new();
        let tank = spawn_enemy(
            &mut world,
            &difficulty,
            0,
            EnemyVariant::Tank,
            5,
            SpriteData::at_matrix(MatrixPosition::new(3, 3)),
        )
        .unwrap();

        let expected_armor = progression_quadratic(QuadraticProgression {
            default_value: ENEMY_ARMOR,
            scale: ENEMY_ARMOR_GROWTH,
            level: 5,
            retardation_level: Some(ENEMY_ARMOR_GROWTH_RETARDATION_LEVEL),
            ..Default::default()
        });

        let mut live = world.get::<&mut Live>(tank).unwrap();
        assert_eq!(live.armor(), expected_armor);
        assert_eq!(live.max_armor(), expected_armor);

        let health = live.health();
        let outcome = live.damage(expected_armor - 1.0);
        assert_eq!(outcome.health_lost, 0.0);
        assert_eq!(live.health(), health);
        assert!((live.armor() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_only_tanks_have_armor() {
        let difficulty = Difficulty::default();
        for variant in EnemyVariant::SPAWNABLE {
            let stats = enemy_stats(&difficulty, variant, 3);
            assert_eq!(stats.armor > 0.0, variant == EnemyVariant::Tank, "{:?}", variant);
        }
    }

    #[test]
    fn test_multipliers_scale_base_stats() {
        let difficulty = Difficulty::default();
        let boss = enemy_stats(&difficulty, EnemyVariant::Boss, 1);
        let demon = enemy_stats(&difficulty, EnemyVariant::Demon, 1);
        assert!(boss.health > demon.health);
        assert!(boss.speed < demon.speed);

        // level 1: 60 * 8.0 * (1 + 0.35)
        assert!((boss.health - 648.0).abs() < 1e-2);
    }

    #[test]
    fn test_player_starts_with_base_stats() {
        let difficulty = Difficulty::default();
        let mut world = World::new();
        let player = spawn_player(
            &mut world,
            &difficulty,
            25,
            SpriteData::at_matrix(MatrixPosition::new(2, 2)),
        )
        .unwrap();

        let state = world.get::<&Player>(player).unwrap();
        assert_eq!(state.coins, 25);
        assert_eq!(state.stamina, PLAYER_STAMINA);
        assert_eq!(world.get::<&Live>(player).unwrap().health(), PLAYER_HEALTH);
        assert_eq!(world.get::<&Speed>(player).unwrap().0, PLAYER_SPEED);
    }
}
